pub mod measurement_reader;

pub use measurement_reader::{
    decode_input, parse_row, InputSource, MeasurementReader, MeasurementRows, RawMeasurementRow,
};

pub mod commodity;
pub mod data_point;
pub mod interval;
pub mod raw_series;

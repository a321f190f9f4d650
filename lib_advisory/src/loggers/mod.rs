pub mod loggerlocal;
pub mod logrecord;

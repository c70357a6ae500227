pub mod io;
pub mod pipeline;
pub mod quant;

mod u64_deserializer;
pub use u64_deserializer::*;

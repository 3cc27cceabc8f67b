/// Pairing based accumulator of credential indices
pub mod cks;

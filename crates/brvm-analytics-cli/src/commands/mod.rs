pub mod analyse;
pub mod projection;
pub mod ratios;
pub mod valuation;

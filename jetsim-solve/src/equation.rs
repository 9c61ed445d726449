mod observe;

pub mod brent;

pub use observe::Observer;

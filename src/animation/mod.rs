pub mod ease;

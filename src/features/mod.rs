pub mod equipment;

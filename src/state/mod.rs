pub mod observed;

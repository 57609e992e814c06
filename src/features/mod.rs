pub mod expires;

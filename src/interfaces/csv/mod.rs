pub mod command_reader;
pub mod escrow_writer;

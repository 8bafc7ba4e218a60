pub mod record;
pub mod verify;

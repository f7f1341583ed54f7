pub mod inspect;
pub mod pack;
pub mod unpack;
pub mod verify;

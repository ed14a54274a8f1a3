pub mod check;
pub mod init;
pub mod link;
pub mod outline;
pub mod replay;

pub use check::{check, CheckArgs};
pub use init::{init, InitArgs};
pub use link::{link, LinkArgs};
pub use outline::{outline, OutlineArgs};
pub use replay::{replay, ReplayArgs};

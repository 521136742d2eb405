mod tasks;

pub use tasks::{LoadTicket, TaskBoard};

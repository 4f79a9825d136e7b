mod book;
mod common;

pub use self::{book::*, common::*};

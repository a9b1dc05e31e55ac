//! Extension traits

mod depot;
mod result;
mod subject;

pub(crate) use depot::DepotExt as _;
pub(crate) use result::ResultExt as _;
pub(crate) use subject::SubjectExt as _;

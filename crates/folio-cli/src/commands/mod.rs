pub(crate) mod admin;
pub(crate) mod console;
pub(crate) mod contact;
pub(crate) mod cv;
pub(crate) mod site;

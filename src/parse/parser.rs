use crate::CallSite;

/// The call sites declared in a parsed declaration file, in file order.
#[derive(Debug)]
pub struct ParsedSites {
    pub sites: Vec<CallSite>,
}

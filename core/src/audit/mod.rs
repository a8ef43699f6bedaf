pub(crate) mod citations;
pub(crate) mod ledger;

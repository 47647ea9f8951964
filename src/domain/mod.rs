pub(crate) mod memo;

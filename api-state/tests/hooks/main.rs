mod call;
mod form;
mod list;
mod pagination;

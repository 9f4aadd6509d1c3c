mod arrays;
mod async_validation;
mod tree;

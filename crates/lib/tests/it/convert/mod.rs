mod strategies;
mod sync;

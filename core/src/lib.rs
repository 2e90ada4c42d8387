pub mod network;
pub mod scanner;

#[cfg(test)]
mod test_utils;

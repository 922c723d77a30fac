pub mod api;
pub mod page;
pub mod test;

#[cfg(test)]
mod api_test;

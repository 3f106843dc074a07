#[cfg(test)]
mod discovery;
#[cfg(test)]
mod scan;
#[cfg(test)]
mod utils;

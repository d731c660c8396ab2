mod common;
mod modules;
mod registry;
mod routing;
mod verdict;

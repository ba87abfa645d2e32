pub mod commit;
pub mod diff;
pub mod domain;
pub mod error;
pub mod path_tree;
pub mod selection;
pub mod services;

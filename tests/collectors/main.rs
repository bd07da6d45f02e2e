#![allow(clippy::unwrap_used)]
#![allow(clippy::indexing_slicing)]

#[path = "../common/mod.rs"]
mod common;

mod innodb {
    mod status;
}

mod process {
    mod processlist;
}

mod replication {
    mod replica_status;
}

mod status {
    mod global_status;
}

mod variables {
    mod global_variables;
}

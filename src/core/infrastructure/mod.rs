pub mod ceph_client;
pub mod command_runner;

//! # ose-inventory - OSEv3 ansible inventory generator
//!
//! Turns a YAML deployment description into an ansible inventory for the OpenShift (`OSEv3`)
//! installer playbooks.
//!
//! ## Introduction for developers
//!
//! ### Input
//!
//! ```yaml
//! deployment:
//!   ansible_ssh_user: openshift       # deployment variable, ends up in [OSEv3:vars]
//!   hosts:
//!     - connect_to: master.example.com
//!       ip: 10.0.0.1
//!       roles: [masters, nodes]
//!       containerized: true           # host variable
//!   roles:
//!     masters: {}
//!     nodes:
//!       openshift_node_labels: "{'region': 'infra'}"   # role variable
//! debug: false                        # top-level variable, loaded but not rendered
//! ```
//!
//! ### Loading
//!
//! see [config::Config::from_value]
//!
//! The document is parsed by [document::parse] into a generic [serde_yaml::Value] whose scalars
//! keep their source text (`3.10` stays `3.10`). Merge keys (`<<`) are resolved, tags are dropped
//! and non-string keys are read as text. Each level of the tree (root, deployment, host) is then
//! read twice: once for the fields with a dedicated meaning at that level and once as a flat map
//! of every scalar key. The flat map minus the reserved keys of the level becomes that level's
//! `vars`.
//!
//! | **level**  | **reserved keys**                                                           |
//! |------------|-----------------------------------------------------------------------------|
//! | root       | `deployment`                                                                |
//! | deployment | `hosts`, `roles`                                                            |
//! | host       | `connect_to`, `hostname`, `public_hostname`, `ip`, `public_ip`, `node_labels`, `roles` |
//!
//! A reserved key with the wrong shape (a list for `ip`, a string for `roles`, ...) fails with
//! [config::ParseError]. A non-reserved key with a nested value is silently dropped from `vars`.
//!
//! ### Rendering
//!
//! see [inventory::Inventory]
//!
//! Given the example above (default [inventory::KeyOrder::Sorted]):
//!
//! ```ini
//! [OSEv3:children]
//! masters
//! nodes
//!
//! [OSEv3:vars]
//! ansible_ssh_user=openshift
//!
//! [masters]
//! master.example.com openshift_ip=10.0.0.1 containerized=true
//!
//! [nodes]
//! master.example.com openshift_ip=10.0.0.1 containerized=true openshift_node_labels={'region': 'infra'}
//!
//! ```
//!
pub mod config;
pub mod document;
pub mod inventory;
mod scalar;

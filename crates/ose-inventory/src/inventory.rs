//! OSEv3 inventory rendering
//!
//! ```text
//! [OSEv3:children]
//! <role>                               one line per role
//!
//! [OSEv3:vars]
//! <key>=<value>                        one line per deployment variable
//!
//! [<role>]                             one group per role
//! <connect_to> <facts> <host vars> <role vars>
//!
//! ```
//!
//! Role variables are appended after the host's own variables. A key present in both is written
//! twice, the consumer of the inventory decides which one wins.
use crate::config::{Config, Host, Vars};
use indexmap::IndexMap;
use std::fmt::{Display, Formatter};

pub const CHILDREN_SECTION: &str = "OSEv3:children";
pub const VARS_SECTION: &str = "OSEv3:vars";

/// Enumeration order of roles and variables in the output
///
/// Hosts are always written in document order.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum KeyOrder {
    /// Lexicographic by key
    #[default]
    Sorted,
    /// As written in the source document
    Document,
}

impl KeyOrder {
    fn entries<'m, V>(self, map: &'m IndexMap<String, V>) -> Vec<(&'m str, &'m V)> {
        let mut entries: Vec<_> = map.iter().map(|(key, value)| (key.as_str(), value)).collect();
        if self == KeyOrder::Sorted {
            entries.sort_by(|(a, _), (b, _)| a.cmp(b));
        }
        entries
    }
}

/// Inventory text of a [Config]
///
/// Rendering is done by [Display], so `to_string()` returns the whole inventory and
/// [Inventory::write_to] streams it.
///
/// ```
/// # use ose_inventory::{config::Config, inventory::Inventory};
/// let config: Config = "deployment: {hosts: [{connect_to: a, roles: [node]}], roles: {node: {}}}"
///     .parse()
///     .unwrap();
///
/// let rendered = Inventory::new(&config).to_string();
/// assert!(rendered.contains("[node]\na\n"));
/// ```
#[derive(derive_new::new, Debug, Clone, Copy)]
pub struct Inventory<'c> {
    config: &'c Config,
    #[new(default)]
    key_order: KeyOrder,
}

impl<'c> Inventory<'c> {
    pub fn with_key_order(mut self, key_order: KeyOrder) -> Self {
        self.key_order = key_order;
        self
    }

    pub fn write_to(&self, mut writer: impl std::io::Write) -> std::io::Result<()> {
        write!(writer, "{self}")?;
        writer.flush()
    }

    fn write_host(&self, f: &mut Formatter<'_>, host: &Host, role_vars: &Vars) -> std::fmt::Result {
        f.write_str(&host.connect_to)?;

        for (key, value) in openshift_facts(host) {
            if !value.is_empty() {
                write!(f, " {key}={value}")?;
            }
        }

        let host_vars = self.key_order.entries(&host.vars);
        let role_vars = self.key_order.entries(role_vars);
        for (key, value) in host_vars.into_iter().chain(role_vars) {
            write!(f, " {key}={value}")?;
        }

        writeln!(f)
    }
}

impl Display for Inventory<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let deployment = &self.config.deployment;
        let roles = self.key_order.entries(&deployment.roles);

        writeln!(f, "[{CHILDREN_SECTION}]")?;
        for (name, _) in &roles {
            writeln!(f, "{name}")?;
        }
        writeln!(f)?;

        writeln!(f, "[{VARS_SECTION}]")?;
        for (key, value) in self.key_order.entries(&deployment.vars) {
            writeln!(f, "{key}={value}")?;
        }
        writeln!(f)?;

        for (name, role_vars) in roles {
            writeln!(f, "[{name}]")?;
            for host in deployment.members(name) {
                self.write_host(f, host, role_vars)?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

fn openshift_facts(host: &Host) -> [(&'static str, &str); 4] {
    [
        ("openshift_ip", host.ip.as_str()),
        ("openshift_public_ip", host.public_ip.as_str()),
        ("openshift_hostname", host.hostname.as_str()),
        ("openshift_public_hostname", host.public_hostname.as_str()),
    ]
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    fn render(yaml: &str) -> String {
        let config: Config = yaml.parse().expect("must be a valid deployment");
        Inventory::new(&config).to_string()
    }

    #[test]
    fn host_in_multiple_groups() {
        let rendered = render(
            r#"
            deployment:
              hosts:
                - connect_to: m1
                  roles: [master, node]
              roles:
                master: {a: "1"}
                node: {}
            "#,
        );

        assert_eq!(
            rendered,
            "[OSEv3:children]\nmaster\nnode\n\n[OSEv3:vars]\n\n[master]\nm1 a=1\n\n[node]\nm1\n\n"
        );
    }

    #[test]
    fn host_vars_and_facts() {
        let rendered = render(
            r#"
            deployment:
              hosts:
                - connect_to: n1.example.com
                  public_hostname: n1.public.example.com
                  ip: 10.0.0.2
                  hostname: n1.internal
                  foo: bar
                  roles: [node]
              roles:
                node: {region: infra}
            "#,
        );

        assert_eq!(
            rendered.lines().nth(6),
            Some(
                "n1.example.com openshift_ip=10.0.0.2 openshift_hostname=n1.internal \
                 openshift_public_hostname=n1.public.example.com foo=bar region=infra"
            )
        );
    }

    #[test]
    fn undefined_role_is_never_rendered() {
        let rendered = render(
            r#"
            deployment:
              hosts:
                - {connect_to: edge1, roles: [edge]}
                - {connect_to: n1, roles: [node]}
              roles:
                node:
            "#,
        );

        assert!(!rendered.contains("edge"));
        assert!(rendered.ends_with("[node]\nn1\n\n"));
    }

    #[test]
    fn deployment_vars() {
        let rendered = render(
            r#"
            deployment:
              ansible_ssh_user: openshift
              deployment_type: origin
              hosts: []
            top_level: ignored
            "#,
        );

        assert_eq!(
            rendered,
            "[OSEv3:children]\n\n[OSEv3:vars]\nansible_ssh_user=openshift\ndeployment_type=origin\n\n"
        );
    }

    #[test]
    fn values_are_written_as_in_the_document() {
        let rendered = render(
            r#"
            deployment:
              openshift_release: 3.10
              hosts:
                - connect_to: n1
                  mask: 0x1F
                  roles: [node]
              roles:
                node: {weight: 1.50}
            "#,
        );

        assert_eq!(
            rendered,
            "[OSEv3:children]\nnode\n\n[OSEv3:vars]\nopenshift_release=3.10\n\n\
             [node]\nn1 mask=0x1F weight=1.50\n\n"
        );
    }

    #[test]
    fn empty_config() {
        assert_eq!(render(""), "[OSEv3:children]\n\n[OSEv3:vars]\n\n");
    }

    #[test]
    fn overlapping_vars_are_not_merged() {
        let rendered = render(
            r#"
            deployment:
              hosts:
                - {connect_to: a, roles: [node], zone: a}
              roles:
                node: {zone: b}
            "#,
        );

        assert!(rendered.contains("[node]\na zone=a zone=b\n"));
    }

    #[test]
    fn host_order_is_preserved() {
        let rendered = render(
            r#"
            deployment:
              hosts:
                - {connect_to: c, roles: [node]}
                - {connect_to: a, roles: [master]}
                - {connect_to: b, roles: [node, node]}
              roles:
                node:
                master:
            "#,
        );

        assert!(rendered.contains("[node]\nc\nb\n\n"));
        assert!(rendered.contains("[master]\na\n\n"));
    }

    #[test]
    fn key_order() {
        let config: Config = r#"
            deployment:
              zeta: 1
              alpha: 2
              hosts:
                - {connect_to: h, roles: [node, master], y: 1, x: 2}
              roles:
                node: {d: 1, c: 2}
                master:
            "#
        .parse()
        .expect("must be a valid deployment");

        let sorted = Inventory::new(&config).to_string();
        assert_eq!(
            sorted,
            "[OSEv3:children]\nmaster\nnode\n\n\
             [OSEv3:vars]\nalpha=2\nzeta=1\n\n\
             [master]\nh x=2 y=1\n\n\
             [node]\nh x=2 y=1 c=2 d=1\n\n"
        );

        let document = Inventory::new(&config)
            .with_key_order(KeyOrder::Document)
            .to_string();
        assert_eq!(
            document,
            "[OSEv3:children]\nnode\nmaster\n\n\
             [OSEv3:vars]\nzeta=1\nalpha=2\n\n\
             [node]\nh y=1 x=2 d=1 c=2\n\n\
             [master]\nh y=1 x=2\n\n"
        );
    }

    #[test]
    fn deterministic() {
        let yaml = r#"
            deployment:
              b: 1
              a: 2
              hosts:
                - {connect_to: h, roles: [r2, r1], k: v, j: w}
              roles:
                r2: {x: 1}
                r1: {y: 2}
            "#;

        assert_eq!(render(yaml), render(yaml));
    }

    #[test]
    fn write_to_sink() {
        let config: Config = "deployment: {hosts: [{connect_to: a, roles: [r]}], roles: {r: ~}}"
            .parse()
            .expect("must be a valid deployment");
        let inventory = Inventory::new(&config);

        let mut sink = Vec::new();
        inventory.write_to(&mut sink).expect("writing to a vec");

        assert_eq!(String::from_utf8(sink).expect("utf-8"), inventory.to_string());
    }
}

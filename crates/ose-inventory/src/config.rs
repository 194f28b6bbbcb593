//! typed deployment model
//!
//! Every level of the document (root, deployment, host) is read twice:
//! - once into the known fields of that level
//! - once as a flat `key: value` map of everything present
//!
//! The reserved keys of the level are removed from the flat map and the remainder is kept as that
//! level's `vars`. Entries of the flat map whose value is not a scalar are skipped, so are keys that
//! are not strings when reading the known fields.
//!
//! Merge keys (`<<: *defaults`) are resolved before either read.
use crate::document;
use crate::scalar::{self, Scalar};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_yaml::Value;

/// Variables in document order
pub type Vars = IndexMap<String, String>;

/// Role name to the variables applied to every host of that role
pub type Role = IndexMap<String, Vars>;

/// Root of a deployment description
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct Config {
    pub deployment: Deployment,
    /// Top-level keys other than `deployment`
    pub vars: Vars,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct Deployment {
    pub hosts: Vec<Host>,
    pub roles: Role,
    /// Deployment keys other than `hosts` and `roles`
    pub vars: Vars,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct Host {
    /// Address or name used to reach the host
    pub connect_to: String,
    pub hostname: String,
    pub public_hostname: String,
    pub ip: String,
    pub public_ip: String,
    pub node_labels: String,
    pub roles: Vec<String>,
    /// Host keys other than the fields above
    pub vars: Vars,
}

impl Config {
    /// Builds the model from an already parsed document
    ///
    /// Use [document::parse] (or `str::parse::<Config>`) to keep scalars as written.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn from_value(node: &Value) -> Result<Self, ParseError> {
        #[derive(Deserialize)]
        struct Params {
            deployment: Option<Value>,
        }

        if node.is_null() {
            tracing::debug!("empty document");
            return Ok(Self::default());
        }

        let mut node = node.clone();
        node.apply_merge().map_err(ParseError::Merge)?;
        let node = &node;

        let params = Params::deserialize(&known_fields(node)).map_err(ParseError::Root)?;
        let vars = residual_vars(node, Level::Root)?;

        let deployment = match &params.deployment {
            Some(deployment) => Deployment::load(deployment)?,
            None => Deployment::default(),
        };

        Ok(Self { deployment, vars })
    }
}

impl std::str::FromStr for Config {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let node = document::parse(s).map_err(ParseError::Syntax)?;
        Self::from_value(&node)
    }
}

impl Deployment {
    fn load(node: &Value) -> Result<Self, ParseError> {
        #[derive(Deserialize)]
        struct Params {
            hosts: Option<Vec<Value>>,
            roles: Option<IndexMap<Scalar, Option<IndexMap<Scalar, Scalar>>>>,
        }

        if node.is_null() {
            return Ok(Self::default());
        }

        let params = Params::deserialize(&known_fields(node)).map_err(ParseError::Deployment)?;
        let vars = residual_vars(node, Level::Deployment)?;

        let hosts = params
            .hosts
            .unwrap_or_default()
            .iter()
            .enumerate()
            .map(|(index, host)| Host::load(index, host))
            .collect::<Result<Vec<_>, _>>()?;

        let roles: Role = params
            .roles
            .unwrap_or_default()
            .into_iter()
            .map(|(name, role_vars)| {
                let role_vars: Vars = role_vars
                    .unwrap_or_default()
                    .into_iter()
                    .map(|(key, value)| (String::from(key), String::from(value)))
                    .collect();
                (String::from(name), role_vars)
            })
            .collect();

        tracing::debug!(hosts = hosts.len(), roles = roles.len(), "deployment loaded");

        Ok(Self { hosts, roles, vars })
    }

    /// Hosts that are a member of `role`, in document order
    pub fn members<'d>(&'d self, role: &'d str) -> impl Iterator<Item = &'d Host> + 'd {
        self.hosts.iter().filter(move |host| host.has_role(role))
    }
}

impl Host {
    fn load(index: usize, node: &Value) -> Result<Self, ParseError> {
        #[derive(Deserialize)]
        struct Params {
            #[serde(deserialize_with = "scalar::string")]
            connect_to: String,
            #[serde(default, deserialize_with = "scalar::string")]
            hostname: String,
            #[serde(default, deserialize_with = "scalar::string")]
            public_hostname: String,
            #[serde(default, deserialize_with = "scalar::string")]
            ip: String,
            #[serde(default, deserialize_with = "scalar::string")]
            public_ip: String,
            #[serde(default, deserialize_with = "scalar::string")]
            node_labels: String,
            roles: Option<Vec<Scalar>>,
        }

        let params = Params::deserialize(&known_fields(node))
            .map_err(|source| ParseError::Host { index, source })?;
        let vars = residual_vars(node, Level::Host(index))?;

        tracing::trace!(index, connect_to = %params.connect_to, "host loaded");

        Ok(Self {
            connect_to: params.connect_to,
            hostname: params.hostname,
            public_hostname: params.public_hostname,
            ip: params.ip,
            public_ip: params.public_ip,
            node_labels: params.node_labels,
            roles: params
                .roles
                .unwrap_or_default()
                .into_iter()
                .map(Into::into)
                .collect(),
            vars,
        })
    }

    /// Exact, case-sensitive membership test
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

/// Nesting level of a node in the document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Root,
    Deployment,
    /// Host at this index of `deployment.hosts`
    Host(usize),
}

impl Level {
    /// Keys with dedicated fields, never part of `vars`
    pub fn reserved_keys(&self) -> &'static [&'static str] {
        match self {
            Level::Root => &["deployment"],
            Level::Deployment => &["hosts", "roles"],
            Level::Host(_) => &[
                "connect_to",
                "hostname",
                "public_hostname",
                "ip",
                "public_ip",
                "node_labels",
                "roles",
            ],
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Level::Root => f.write_str("document root"),
            Level::Deployment => f.write_str("deployment"),
            Level::Host(index) => write!(f, "host #{index}"),
        }
    }
}

/// `node` without the entries whose key can not name a field
fn known_fields(node: &Value) -> Value {
    match node {
        Value::Mapping(mapping) => Value::Mapping(
            mapping
                .iter()
                .filter(|(key, _)| key.is_string())
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
        ),
        Value::Tagged(tagged) => known_fields(&tagged.value),
        other => other.clone(),
    }
}

/// Flat projection of `node` minus the reserved keys of `level`
fn residual_vars(node: &Value, level: Level) -> Result<Vars, ParseError> {
    let mapping = match node {
        Value::Null => return Ok(Vars::new()),
        Value::Mapping(mapping) => mapping,
        Value::Tagged(tagged) => return residual_vars(&tagged.value, level),
        _ => return Err(ParseError::NotAMapping { level }),
    };

    let mut vars = Vars::with_capacity(mapping.len());
    for (key, value) in mapping {
        match (scalar::to_string(key), scalar::to_string(value)) {
            (Some(key), Some(value)) => {
                vars.insert(key, value);
            }
            // nested values can not be expressed as a variable
            (key, _) => tracing::trace!(?key, %level, "skipping non-scalar entry"),
        }
    }

    for reserved in level.reserved_keys() {
        vars.shift_remove(*reserved);
    }

    Ok(vars)
}

#[derive(thiserror::Error, Debug)]
pub enum ParseError {
    #[error("Unable to parse document")]
    Syntax(#[source] serde_yaml::Error),
    #[error("Unable to resolve merge keys")]
    Merge(#[source] serde_yaml::Error),
    #[error("Invalid document root")]
    Root(#[source] serde_yaml::Error),
    #[error("Invalid deployment")]
    Deployment(#[source] serde_yaml::Error),
    #[error("Invalid host #{index}")]
    Host {
        index: usize,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("Expected {level} to be a mapping")]
    NotAMapping { level: Level },
}

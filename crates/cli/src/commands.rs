//! Subcommands and their results.

use std::collections::BTreeMap;
use std::fmt;

use anyhow::Result;
use clap::Subcommand;
use hashring::partitioner::{Blake3Partitioner, SipPartitioner, Xxh3Partitioner};
use hashring::{HashKind, HashRing, NodeId, Partitioner, RingConfig};
use serde::Serialize;
use tracing::{debug, info};

/// Keys checked by `disruption` when none are given.
pub const DEFAULT_DISRUPTION_KEYS: [&str; 6] = ["abc123", "def123", "fasdf", "things", "and", "stuff"];

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Count how often each node is picked for keys "0".."N", then repeat
    /// after each removal.
    Distribution {
        /// Number of keys to place.
        #[arg(long, default_value_t = 1_000_000)]
        keys: usize,
        /// Replicas per key.
        #[arg(long, default_value_t = 3)]
        replicas: usize,
        /// Node to remove before the next count; repeatable.
        #[arg(long, value_name = "NODE")]
        remove: Vec<String>,
    },
    /// Show each key's replica set before and after removing nodes.
    Disruption {
        /// Replicas per key.
        #[arg(long, default_value_t = 3)]
        replicas: usize,
        /// Node to remove; repeatable.
        #[arg(long, value_name = "NODE", required = true)]
        remove: Vec<String>,
        /// Keys to check.
        keys: Vec<String>,
    },
    /// Print the node, or replica list, for a key.
    Lookup {
        key: String,
        /// Replicas to return.
        #[arg(long, default_value_t = 1)]
        replicas: usize,
    },
    /// Print the share of the ring each node owns.
    Ownership,
}

/// Per-node counts from one `distribution` pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionStage {
    /// Node removed just before this pass; `None` for the first pass.
    pub removed: Option<NodeId>,
    pub counts: BTreeMap<NodeId, usize>,
}

/// One key's sorted replica set around a removal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyMovement {
    pub key: String,
    pub before: Vec<NodeId>,
    pub after: Vec<NodeId>,
}

impl KeyMovement {
    pub fn moved(&self) -> bool {
        self.before != self.after
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum CommandResult {
    Distribution {
        stages: Vec<DistributionStage>,
    },
    Disruption {
        removed: Vec<NodeId>,
        keys: Vec<KeyMovement>,
    },
    Lookup {
        key: String,
        /// Position of the key.
        token: String,
        /// Position of the anchor the key resolved to.
        anchor: String,
        replicas: Vec<NodeId>,
    },
    Ownership {
        shares: BTreeMap<NodeId, f64>,
    },
}

impl Command {
    /// Build the configured ring and run the command against it.
    pub fn execute(&self, config: &RingConfig) -> Result<CommandResult> {
        let builder = config.builder();
        match config.hash {
            HashKind::Sha1 => self.execute_on(&builder.build()?),
            HashKind::Sip => self.execute_on(&builder.with_partitioner(SipPartitioner).build()?),
            HashKind::Xxh3 => self.execute_on(&builder.with_partitioner(Xxh3Partitioner).build()?),
            HashKind::Blake3 => self.execute_on(&builder.with_partitioner(Blake3Partitioner).build()?),
        }
    }

    pub fn execute_on<P>(&self, ring: &HashRing<P>) -> Result<CommandResult>
    where
        P: Partitioner,
        P::TokenType: fmt::Display,
    {
        info!(
            partitioner = ring.partitioner_name(),
            vnodes = ring.vnodes(),
            nodes = ring.node_count(),
            "ring ready"
        );

        match self {
            Command::Distribution { keys, replicas, remove } => {
                let members = ring.nodes();
                let mut stages = vec![DistributionStage {
                    removed: None,
                    counts: count_replicas(ring, &members, *keys, *replicas)?,
                }];
                for node in remove {
                    ring.remove([node])?;
                    info!(%node, "removed node, recounting");
                    stages.push(DistributionStage {
                        removed: Some(NodeId::from(node)),
                        counts: count_replicas(ring, &members, *keys, *replicas)?,
                    });
                }
                Ok(CommandResult::Distribution { stages })
            }
            Command::Disruption { replicas, remove, keys } => {
                let keys: Vec<String> = if keys.is_empty() {
                    DEFAULT_DISRUPTION_KEYS.iter().map(|k| k.to_string()).collect()
                } else {
                    keys.clone()
                };

                let before = keys
                    .iter()
                    .map(|key| sorted_replicas(ring, key, *replicas))
                    .collect::<Result<Vec<_>>>()?;
                ring.remove(remove)?;

                let mut movements = Vec::with_capacity(keys.len());
                for (key, before) in keys.into_iter().zip(before) {
                    let after = sorted_replicas(ring, &key, *replicas)?;
                    movements.push(KeyMovement { key, before, after });
                }
                Ok(CommandResult::Disruption {
                    removed: remove.iter().map(NodeId::from).collect(),
                    keys: movements,
                })
            }
            Command::Lookup { key, replicas } => {
                let (anchor, _) = ring.get_anchor(key)?;
                debug!(%anchor, "selected anchor");
                Ok(CommandResult::Lookup {
                    key: key.clone(),
                    token: ring.token_for(key).to_string(),
                    anchor: anchor.to_string(),
                    replicas: ring.mget(key, *replicas)?,
                })
            }
            Command::Ownership => Ok(CommandResult::Ownership {
                shares: ring.topology().ownership(),
            }),
        }
    }
}

/// How many times each of `members` appears in the replica sets of keys
/// `"0"` through `keys - 1`. Members no longer on the ring count zero.
pub fn count_replicas<P: Partitioner>(
    ring: &HashRing<P>,
    members: &[NodeId],
    keys: usize,
    replicas: usize,
) -> Result<BTreeMap<NodeId, usize>> {
    let mut counts: BTreeMap<NodeId, usize> = members.iter().map(|m| (m.clone(), 0)).collect();
    for key in 0..keys {
        for node in ring.mget(key.to_string(), replicas)? {
            *counts.entry(node).or_default() += 1;
        }
    }
    Ok(counts)
}

fn sorted_replicas<P: Partitioner>(ring: &HashRing<P>, key: &str, replicas: usize) -> Result<Vec<NodeId>> {
    let mut nodes = ring.mget(key, replicas)?;
    nodes.sort();
    Ok(nodes)
}

fn join(nodes: &[NodeId]) -> String {
    nodes.iter().map(NodeId::as_str).collect::<Vec<_>>().join(", ")
}

impl fmt::Display for CommandResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandResult::Distribution { stages } => {
                for stage in stages {
                    match &stage.removed {
                        Some(node) => writeln!(f, "after removing {}:", node)?,
                        None => writeln!(f, "initial:")?,
                    }
                    for (node, count) in &stage.counts {
                        writeln!(f, "  {:<12} {}", node, count)?;
                    }
                }
                Ok(())
            }
            CommandResult::Disruption { keys, .. } => {
                for movement in keys {
                    writeln!(f, "{:<10} before: [{}]", movement.key, join(&movement.before))?;
                    writeln!(f, "{:<10} after:  [{}]", "", join(&movement.after))?;
                }
                Ok(())
            }
            CommandResult::Lookup {
                key,
                token,
                anchor,
                replicas,
            } => writeln!(f, "{} ({}) -> {} -> [{}]", key, token, anchor, join(replicas)),
            CommandResult::Ownership { shares } => {
                for (node, share) in shares {
                    writeln!(f, "{:<12} {:>7.3}%", node, share * 100.0)?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn servers(vnodes: usize) -> RingConfig {
        RingConfig {
            vnodes,
            nodes: crate::config::DEFAULT_NODES.into_iter().map(NodeId::from).collect(),
            ..RingConfig::default()
        }
    }

    #[test]
    fn test_distribution_counts_every_replica() {
        let command = Command::Distribution {
            keys: 2000,
            replicas: 3,
            remove: vec!["server05".into()],
        };
        let CommandResult::Distribution { stages } = command.execute(&servers(50)).unwrap() else {
            panic!("wrong result variant");
        };

        assert_eq!(stages.len(), 2);
        assert_eq!(stages[0].counts.values().sum::<usize>(), 6000);
        assert_eq!(stages[1].removed, Some(NodeId::from("server05")));
        assert_eq!(stages[1].counts["server05"], 0);
        assert_eq!(stages[1].counts.values().sum::<usize>(), 6000);
    }

    #[test]
    fn test_disruption_default_keys() {
        let command = Command::Disruption {
            replicas: 3,
            remove: vec!["server05".into()],
            keys: Vec::new(),
        };
        let CommandResult::Disruption { removed, keys } = command.execute(&servers(30)).unwrap() else {
            panic!("wrong result variant");
        };

        assert_eq!(removed, ["server05"]);
        assert_eq!(keys.len(), DEFAULT_DISRUPTION_KEYS.len());
        let stuff = keys.iter().find(|m| m.key == "stuff").unwrap();
        assert!(!stuff.moved());
        assert_eq!(stuff.after, ["server01", "server02", "server03"]);
        let abc = keys.iter().find(|m| m.key == "abc123").unwrap();
        assert_eq!(abc.before, ["server02", "server03", "server05"]);
        assert_eq!(abc.after, ["server01", "server02", "server03"]);
    }

    #[test]
    fn test_disruption_unknown_node() {
        let command = Command::Disruption {
            replicas: 3,
            remove: vec!["server99".into()],
            keys: vec!["k".into()],
        };
        let err = command.execute(&servers(10)).unwrap_err();
        assert!(err.to_string().contains("server99"));
    }

    #[test]
    fn test_lookup() {
        let command = Command::Lookup {
            key: "my-object-key".into(),
            replicas: 3,
        };
        let result = command.execute(&servers(10)).unwrap();
        let CommandResult::Lookup { replicas, token, .. } = &result else {
            panic!("wrong result variant");
        };
        assert_eq!(replicas, &["server01", "server04", "server03"]);
        assert_eq!(token.len(), 40, "SHA-1 token printed as hex");
        assert!(result.to_string().starts_with("my-object-key ("));
    }

    #[test]
    fn test_ownership_with_each_hash() {
        for hash in HashKind::ALL {
            let config = RingConfig { hash, ..servers(100) };
            let CommandResult::Ownership { shares } = Command::Ownership.execute(&config).unwrap() else {
                panic!("wrong result variant");
            };
            assert_eq!(shares.len(), 5, "{hash}");
            let total: f64 = shares.values().sum();
            assert!((total - 1.0).abs() < 1e-6, "{hash}: {total}");
        }
    }

    #[test]
    fn test_json_output_is_tagged() {
        let result = Command::Lookup {
            key: "k".into(),
            replicas: 1,
        }
        .execute(&servers(10))
        .unwrap();
        let json: serde_json::Value = serde_json::to_value(&result).unwrap();
        assert_eq!(json["command"], "lookup");
        assert_eq!(json["key"], "k");
        assert_eq!(json["replicas"].as_array().unwrap().len(), 1);
    }
}

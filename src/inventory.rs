use crate::errors::ToolkitError;
use crate::utils::{read_file_content, write_file_content};
use serde::Deserialize;
use serde_yaml::{Mapping, Value};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use tracing::{debug, info, trace, warn};

const ALL_KEY: &str = "all";
const CHILDREN_KEY: &str = "children";
const HOSTS_KEY: &str = "hosts";
const ANSIBLE_HOST_KEY: &str = "ansible_host";
const SERIAL_NUMBER_KEY: &str = "serial_number";

/// One device in an ACT topology file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ActNode {
    pub ip_addr: String,
    #[serde(default)]
    pub node_type: String,
    #[serde(default)]
    pub ports: Vec<String>,
}

/// The parts of an ACT topology file the inventory update needs. Nodes are
/// listed as single-key maps: `- leaf1: { ip_addr: ..., node_type: veos }`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActTopology {
    #[serde(default)]
    nodes: Vec<BTreeMap<String, ActNode>>,
}

impl ActTopology {
    pub fn from_yaml(content: &str) -> Result<Self, ToolkitError> {
        serde_yaml::from_str(content)
            .map_err(|e| ToolkitError::InventoryError(format!("Invalid ACT topology: {}", e)))
    }

    pub fn nodes(&self) -> impl Iterator<Item = (&str, &ActNode)> {
        self.nodes
            .iter()
            .flat_map(|entry| entry.iter().map(|(name, node)| (name.as_str(), node)))
    }

    /// Node name to management address.
    pub fn management_addresses(&self) -> HashMap<String, String> {
        self.nodes()
            .map(|(name, node)| (name.to_string(), node.ip_addr.clone()))
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InventoryUpdate {
    pub hosts_updated: usize,
    pub serials_removed: usize,
}

/// Points every host under `all.children` found in `addresses` at its ACT
/// management address and strips `serial_number` from those hosts, at any
/// group depth. Hosts listed directly under `all.hosts` are left alone.
pub fn update_inventory(inventory: &mut Value, addresses: &HashMap<String, String>) -> InventoryUpdate {
    let mut update = InventoryUpdate::default();
    match inventory
        .get_mut(ALL_KEY)
        .and_then(|all| all.get_mut(CHILDREN_KEY))
    {
        Some(children) => walk_groups(children, addresses, &mut update),
        None => warn!("Inventory has no all.children groups; nothing to update"),
    }
    debug!(
        "Inventory update: {} hosts readdressed, {} serial numbers removed",
        update.hosts_updated, update.serials_removed
    );
    update
}

fn walk_groups(node: &mut Value, addresses: &HashMap<String, String>, update: &mut InventoryUpdate) {
    let Value::Mapping(map) = node else {
        return;
    };
    for (key, child) in map.iter_mut() {
        if key.as_str() == Some(HOSTS_KEY) {
            if let Value::Mapping(hosts) = child {
                update_hosts(hosts, addresses, update);
            }
        } else {
            walk_groups(child, addresses, update);
        }
    }
}

fn update_hosts(hosts: &mut Mapping, addresses: &HashMap<String, String>, update: &mut InventoryUpdate) {
    for (name, data) in hosts.iter_mut() {
        let Some(name) = name.as_str() else {
            continue;
        };
        let address = addresses.get(name);

        if data.is_null() && address.is_some() {
            *data = Value::Mapping(Mapping::new());
        }
        let Value::Mapping(attrs) = data else {
            trace!("Host {} has no attributes", name);
            continue;
        };

        match address {
            Some(ip) => {
                attrs.insert(
                    Value::String(ANSIBLE_HOST_KEY.to_string()),
                    Value::String(ip.clone()),
                );
                update.hosts_updated += 1;
            }
            None => debug!("Host {} is not part of the ACT topology", name),
        }
        if attrs.shift_remove(SERIAL_NUMBER_KEY).is_some() {
            update.serials_removed += 1;
        }
    }
}

/// Reads an Ansible inventory and an ACT topology, updates the inventory
/// and writes it to `output`.
pub async fn update_inventory_file(
    original: &Path,
    topology: &Path,
    output: &Path,
) -> Result<InventoryUpdate, ToolkitError> {
    let inventory_content = read_file_content(original).await?;
    let topology_content = read_file_content(topology).await?;

    let mut inventory: Value = serde_yaml::from_str(&inventory_content).map_err(|e| {
        ToolkitError::InventoryError(format!("Invalid inventory {}: {}", original.display(), e))
    })?;
    let topology = ActTopology::from_yaml(&topology_content)?;

    let update = update_inventory(&mut inventory, &topology.management_addresses());

    let rendered = serde_yaml::to_string(&inventory)?;
    write_file_content(output, &rendered).await?;
    info!("Updated inventory written to {}", output.display());
    Ok(update)
}

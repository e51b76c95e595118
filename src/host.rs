use std::collections::{BTreeMap, HashMap};

use crate::params::{ParamName, ParamValue};

/// Reads never fail: a missing entry is `None` and callers pick a default.
pub trait NodeHost {
    fn param(&self, name: ParamName) -> Option<ParamValue>;
    fn set_param(&mut self, name: ParamName, value: ParamValue);
    fn request_redraw(&mut self);
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryNode {
    params: HashMap<ParamName, ParamValue>,
    redraw_requests: usize,
}

impl InMemoryNode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_param(mut self, name: ParamName, value: impl Into<ParamValue>) -> Self {
        self.params.insert(name, value.into());
        self
    }

    pub fn redraw_requests(&self) -> usize {
        self.redraw_requests
    }

    pub fn remove_param(&mut self, name: ParamName) -> Option<ParamValue> {
        self.params.remove(&name)
    }

    /// Serializes the parameters keyed by wire name, in stable order.
    pub fn to_json(&self) -> serde_json::Result<String> {
        let snapshot = self
            .params
            .iter()
            .map(|(name, value)| (name.as_str(), value))
            .collect::<BTreeMap<_, _>>();
        serde_json::to_string(&snapshot)
    }

    /// Restores parameters from a snapshot; unknown names are skipped.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let raw: BTreeMap<String, ParamValue> = serde_json::from_str(json)?;
        let mut node = Self::new();
        for (name, value) in raw {
            match ParamName::from_name(&name) {
                Some(param) => {
                    node.params.insert(param, value);
                }
                None => tracing::debug!(name = %name, "skipping unknown node parameter"),
            }
        }
        Ok(node)
    }
}

impl NodeHost for InMemoryNode {
    fn param(&self, name: ParamName) -> Option<ParamValue> {
        self.params.get(&name).cloned()
    }

    fn set_param(&mut self, name: ParamName, value: ParamValue) {
        tracing::trace!(param = %name, ?value, "set node parameter");
        self.params.insert(name, value);
    }

    fn request_redraw(&mut self) {
        self.redraw_requests = self.redraw_requests.saturating_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_snapshot_uses_wire_names_in_stable_order() {
        let node = InMemoryNode::new()
            .with_param(ParamName::PosY, 4)
            .with_param(ParamName::AspectRatio, "1:1")
            .with_param(ParamName::PosX, 3);
        let json = node.to_json().expect("snapshot should serialize");
        assert_eq!(json, r#"{"aspect_ratio":"1:1","pos_x":3,"pos_y":4}"#);
    }

    #[test]
    fn from_json_skips_unknown_names() {
        let node = InMemoryNode::from_json(r#"{"pos_x":7,"keep_audio":1,"input_folder":"a"}"#)
            .expect("snapshot should parse");
        assert_eq!(node.param(ParamName::PosX), Some(ParamValue::Int(7)));
        assert_eq!(
            node.param(ParamName::InputFolder),
            Some(ParamValue::Text("a".to_string()))
        );
        assert_eq!(node.param(ParamName::CropWidth), None);
    }

    #[test]
    fn request_redraw_counts_requests() {
        let mut node = InMemoryNode::new();
        node.request_redraw();
        node.request_redraw();
        assert_eq!(node.redraw_requests(), 2);
    }
}

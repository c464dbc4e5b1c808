//! Custom messages exchanged with the renderer

use serde::{Deserialize, Serialize};
use tviz_tensor::Envelope;

/// Property name the renderer requests the tensor under
pub const TENSOR_PROP: &str = "tensor";

/// Message sent by the renderer
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum IncomingMessage {
    /// Request for a property value
    Prop {
        /// Requested property
        #[serde(default)]
        name: Option<String>,
    },
    /// Scale currently shown by the renderer
    Scale {
        /// Reported scale; absent means every field is unknown
        #[serde(default)]
        scale: ScaleUpdate,
    },
    /// Any other message type
    #[serde(other)]
    Unknown,
}

/// Scale fields reported by the renderer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScaleUpdate {
    /// Value domain
    pub domain: Option<Vec<f64>>,
    /// Scale type, e.g. `linear` or `log`
    #[serde(rename = "type")]
    pub scale_type: Option<String>,
    /// Color scheme
    pub scheme: Option<String>,
}

/// Message sent to the renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum OutgoingMessage {
    /// Property value reply
    Prop {
        /// Kind of value carried, `Tensor` for envelopes
        #[serde(rename = "valueType")]
        value_type: String,
        /// Property name
        name: String,
        /// Encoded tensor
        value: Envelope,
    },
}

impl OutgoingMessage {
    /// Reply to a tensor property read
    pub fn tensor(envelope: Envelope) -> Self {
        OutgoingMessage::Prop {
            value_type: "Tensor".to_string(),
            name: TENSOR_PROP.to_string(),
            value: envelope,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tviz_tensor::{encode, HostArray};

    #[test]
    fn test_parse_prop() {
        let msg: IncomingMessage =
            serde_json::from_str(r#"{"type":"prop","name":"tensor"}"#).unwrap();
        assert_eq!(
            msg,
            IncomingMessage::Prop {
                name: Some("tensor".into())
            }
        );
    }

    #[test]
    fn test_parse_scale() {
        let msg: IncomingMessage = serde_json::from_str(
            r#"{"type":"scale","scale":{"domain":[-1.5,2],"type":"log","scheme":"viridis"}}"#,
        )
        .unwrap();
        assert_eq!(
            msg,
            IncomingMessage::Scale {
                scale: ScaleUpdate {
                    domain: Some(vec![-1.5, 2.0]),
                    scale_type: Some("log".into()),
                    scheme: Some("viridis".into()),
                }
            }
        );
    }

    #[test]
    fn test_parse_partial_scale() {
        let json = r#"{"type":"scale","scale":{"type":"linear"}}"#;
        let msg: IncomingMessage = serde_json::from_str(json).unwrap();
        let IncomingMessage::Scale { scale } = msg else {
            panic!("expected scale message");
        };
        assert_eq!(scale.domain, None);
        assert_eq!(scale.scale_type.as_deref(), Some("linear"));
    }

    #[test]
    fn test_parse_unknown() {
        let msg: IncomingMessage = serde_json::from_str(r#"{"type":"hover","x":3}"#).unwrap();
        assert_eq!(msg, IncomingMessage::Unknown);
    }

    #[test]
    fn test_reply_shape() {
        let array = HostArray::from_vec(vec![2], vec![1u8, 2]).unwrap();
        let reply = OutgoingMessage::tensor(encode(&array).unwrap());
        let value = serde_json::to_value(&reply).unwrap();

        assert_eq!(value["type"], "prop");
        assert_eq!(value["valueType"], "Tensor");
        assert_eq!(value["name"], "tensor");
        assert_eq!(value["value"]["dtype"], "uint8");
        assert_eq!(value["value"]["shape"], serde_json::json!([2]));
        assert_eq!(value.as_object().unwrap().len(), 4);
    }
}

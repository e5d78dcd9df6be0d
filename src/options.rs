use std::fmt;

use crate::embedded::{BuiltinCodec, EmbeddedCodec};

/// What to do when a recognized element cannot be decoded (malformed RLE
/// data, or an embedded image the codec rejects).  Structural format errors
/// always abort the decode, and unknown OSTypes are always skipped,
/// regardless of this policy.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ElementPolicy {
    /// Fail the whole decode with the element's error.
    Escalate,
    /// Drop the element, record a diagnostic, and keep going.
    Skip,
}

/// Settings for decoding an icon family.
pub struct DecodeOptions {
    policy: ElementPolicy,
    codec: Box<dyn EmbeddedCodec>,
}

impl DecodeOptions {
    /// Creates options with the given element policy and the built-in PNG
    /// and JPEG 2000 codec.
    pub fn new(policy: ElementPolicy) -> DecodeOptions {
        DecodeOptions {
            policy,
            codec: Box::new(BuiltinCodec),
        }
    }

    /// Replaces the codec used for embedded PNG and JPEG 2000 payloads.
    pub fn with_codec<C: EmbeddedCodec + 'static>(mut self, codec: C) -> DecodeOptions {
        self.codec = Box::new(codec);
        self
    }

    /// Returns the element policy.
    pub fn policy(&self) -> ElementPolicy {
        self.policy
    }

    /// Returns the codec for embedded payloads.
    pub fn codec(&self) -> &dyn EmbeddedCodec {
        &*self.codec
    }
}

impl fmt::Debug for DecodeOptions {
    fn fmt(&self, out: &mut fmt::Formatter) -> fmt::Result {
        out.debug_struct("DecodeOptions")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

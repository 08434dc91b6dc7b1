// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::StageRegistry;
use crate::traits::Stage;

use super::stages::*;

/// Built-in stage type identifiers and their constructors.
///
/// - "upper" / "lower" / "title" -> ChangeTextCaseStage
/// - "reverse" -> ReverseTextStage
/// - "prefix_suffix" -> PrefixSuffixAdderStage (config `prefix`, `suffix`)
/// - "token_count" -> TokenCounterStage
/// - "concat" -> ConcatenateStage (config `separator`)
/// - "json_field" -> JsonFieldStage (config `field`)
/// - "lexicon" -> LexiconStage (config `resource`)
/// - "passthrough" -> PassthroughStage
const BUILTINS: [(&str, fn() -> Box<dyn Stage>); 10] = [
    ("upper", || -> Box<dyn Stage> { Box::new(ChangeTextCaseStage::upper()) }),
    ("lower", || -> Box<dyn Stage> { Box::new(ChangeTextCaseStage::lower()) }),
    ("title", || -> Box<dyn Stage> { Box::new(ChangeTextCaseStage::title()) }),
    ("reverse", || -> Box<dyn Stage> { Box::new(ReverseTextStage::new()) }),
    ("prefix_suffix", || -> Box<dyn Stage> { Box::new(PrefixSuffixAdderStage::default()) }),
    ("token_count", || -> Box<dyn Stage> { Box::new(TokenCounterStage::new()) }),
    ("concat", || -> Box<dyn Stage> { Box::new(ConcatenateStage::default()) }),
    ("json_field", || -> Box<dyn Stage> { Box::new(JsonFieldStage::default()) }),
    ("lexicon", || -> Box<dyn Stage> { Box::new(LexiconStage::default()) }),
    ("passthrough", || -> Box<dyn Stage> { Box::new(PassthroughStage) }),
];

/// Register every built-in stage type with `registry`.
pub fn register_builtins(registry: &mut StageRegistry) {
    for (type_id, constructor) in BUILTINS {
        registry.register(type_id, constructor);
    }
}

/// List all built-in stage type identifiers
pub fn list_available_types() -> Vec<&'static str> {
    BUILTINS.iter().map(|(type_id, _)| *type_id).collect()
}

/// Check if a built-in stage type exists
pub fn is_type_available(type_id: &str) -> bool {
    BUILTINS.iter().any(|(id, _)| *id == type_id)
}

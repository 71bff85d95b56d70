//! Flag types for declarations.
//!
//! Each set maps the language's modifier keywords onto bits. Lookups are
//! case-insensitive.

bitflags::bitflags! {
    /// Modifiers of the class header.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ClassFlags: u32 {
        const NONE                  = 0;
        const ABSTRACT              = 1 << 0;
        const NATIVE                = 1 << 1;
        const TRANSIENT             = 1 << 2;
        const SAFE_REPLACE          = 1 << 3;
        const NO_EXPORT             = 1 << 4;
        const NATIVE_REPLICATION    = 1 << 5;
        const PER_OBJECT_CONFIG     = 1 << 6;
        const CONFIG                = 1 << 7;
        const PLACEABLE             = 1 << 8;
        const NOT_PLACEABLE         = 1 << 9;
        const EDIT_INLINE_NEW       = 1 << 10;
        const COLLAPSE_CATEGORIES   = 1 << 11;
        const HIDE_DROPDOWN         = 1 << 12;
        const DEPENDS_ON            = 1 << 13;
        const HIDE_CATEGORIES       = 1 << 14;
        const WITHIN                = 1 << 15;
        const GUID                  = 1 << 16;
        const CACHE_EXEMPT          = 1 << 17;
        const EXPORT_STRUCTS        = 1 << 18;
        const INTERFACE             = 1 << 19;
    }
}

impl ClassFlags {
    pub fn from_keyword(text: &str) -> Option<Self> {
        let flag = match text.to_ascii_lowercase().as_str() {
            "abstract" => Self::ABSTRACT,
            "native" => Self::NATIVE,
            "transient" => Self::TRANSIENT,
            "safereplace" => Self::SAFE_REPLACE,
            "noexport" => Self::NO_EXPORT,
            "nativereplication" => Self::NATIVE_REPLICATION,
            "perobjectconfig" => Self::PER_OBJECT_CONFIG,
            "config" => Self::CONFIG,
            "placeable" => Self::PLACEABLE,
            "notplaceable" => Self::NOT_PLACEABLE,
            "editinlinenew" => Self::EDIT_INLINE_NEW,
            "collapsecategories" => Self::COLLAPSE_CATEGORIES,
            "hidedropdown" => Self::HIDE_DROPDOWN,
            "dependson" => Self::DEPENDS_ON,
            "hidecategories" => Self::HIDE_CATEGORIES,
            "within" => Self::WITHIN,
            "guid" => Self::GUID,
            "cacheexempt" => Self::CACHE_EXEMPT,
            "exportstructs" => Self::EXPORT_STRUCTS,
            "interface" => Self::INTERFACE,
            _ => return None,
        };
        Some(flag)
    }
}

bitflags::bitflags! {
    /// Modifiers of variables, struct members, locals and parameters.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct VarFlags: u32 {
        const NONE          = 0;
        const CONST         = 1 << 0;
        const TRANSIENT     = 1 << 1;
        const CONFIG        = 1 << 2;
        const GLOBAL_CONFIG = 1 << 3;
        const LOCALIZED     = 1 << 4;
        const INPUT         = 1 << 5;
        const TRAVEL        = 1 << 6;
        const EXPORT        = 1 << 7;
        const NATIVE        = 1 << 8;
        const PRIVATE       = 1 << 9;
        const PROTECTED     = 1 << 10;
        const PUBLIC        = 1 << 11;
        const EDIT_CONST    = 1 << 12;
        const EDIT_INLINE   = 1 << 13;
        const DEPRECATED    = 1 << 14;
        const NO_EXPORT     = 1 << 15;
        const REPNOTIFY     = 1 << 16;
        const EDITABLE      = 1 << 17;
        // parameters
        const OPTIONAL      = 1 << 20;
        const OUT           = 1 << 21;
        const COERCE        = 1 << 22;
        const SKIP          = 1 << 23;
        // set when the declaration is a local
        const LOCAL         = 1 << 24;
        const PARAMETER     = 1 << 25;
    }
}

impl VarFlags {
    pub fn from_keyword(text: &str) -> Option<Self> {
        let flag = match text.to_ascii_lowercase().as_str() {
            "const" => Self::CONST,
            "transient" => Self::TRANSIENT,
            "config" => Self::CONFIG,
            "globalconfig" => Self::GLOBAL_CONFIG,
            "localized" => Self::LOCALIZED,
            "input" => Self::INPUT,
            "travel" => Self::TRAVEL,
            "export" => Self::EXPORT,
            "native" => Self::NATIVE,
            "private" => Self::PRIVATE,
            "protected" => Self::PROTECTED,
            "public" => Self::PUBLIC,
            "editconst" => Self::EDIT_CONST,
            "editinline" => Self::EDIT_INLINE,
            "deprecated" => Self::DEPRECATED,
            "noexport" => Self::NO_EXPORT,
            "repnotify" => Self::REPNOTIFY,
            "optional" => Self::OPTIONAL,
            "out" => Self::OUT,
            "coerce" => Self::COERCE,
            "skip" => Self::SKIP,
            _ => return None,
        };
        Some(flag)
    }
}

bitflags::bitflags! {
    /// Modifiers of functions, events, operators and delegates.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FunctionFlags: u32 {
        const NONE          = 0;
        const FUNCTION      = 1 << 0;
        const EVENT         = 1 << 1;
        const OPERATOR      = 1 << 2;
        const PRE_OPERATOR  = 1 << 3;
        const POST_OPERATOR = 1 << 4;
        const DELEGATE      = 1 << 5;
        const STATIC        = 1 << 6;
        const FINAL         = 1 << 7;
        const SIMULATED     = 1 << 8;
        const NATIVE        = 1 << 9;
        const ITERATOR      = 1 << 10;
        const LATENT        = 1 << 11;
        const SINGULAR      = 1 << 12;
        const EXEC          = 1 << 13;
        const PRIVATE       = 1 << 14;
        const PROTECTED     = 1 << 15;
        const PUBLIC        = 1 << 16;
        const RELIABLE      = 1 << 17;
        const UNRELIABLE    = 1 << 18;
        const SERVER        = 1 << 19;
        const CLIENT        = 1 << 20;
        const CONST         = 1 << 21;
        const NO_EXPORT     = 1 << 22;
        const DEPRECATED    = 1 << 23;
        /// The declaration ends in `;` instead of a body.
        const DECLARATION_ONLY = 1 << 24;

        const KIND = Self::FUNCTION.bits()
            | Self::EVENT.bits()
            | Self::OPERATOR.bits()
            | Self::PRE_OPERATOR.bits()
            | Self::POST_OPERATOR.bits()
            | Self::DELEGATE.bits();
    }
}

impl FunctionFlags {
    /// Keywords that introduce a function declaration.
    pub fn kind_from_keyword(text: &str) -> Option<Self> {
        let flag = match text.to_ascii_lowercase().as_str() {
            "function" => Self::FUNCTION,
            "event" => Self::EVENT,
            "operator" => Self::OPERATOR,
            "preoperator" => Self::PRE_OPERATOR,
            "postoperator" => Self::POST_OPERATOR,
            "delegate" => Self::DELEGATE,
            _ => return None,
        };
        Some(flag)
    }

    /// Keywords that may precede (or, for `const`, follow) a function.
    pub fn from_keyword(text: &str) -> Option<Self> {
        let flag = match text.to_ascii_lowercase().as_str() {
            "static" => Self::STATIC,
            "final" => Self::FINAL,
            "simulated" => Self::SIMULATED,
            "native" => Self::NATIVE,
            "iterator" => Self::ITERATOR,
            "latent" => Self::LATENT,
            "singular" => Self::SINGULAR,
            "exec" => Self::EXEC,
            "private" => Self::PRIVATE,
            "protected" => Self::PROTECTED,
            "public" => Self::PUBLIC,
            "reliable" => Self::RELIABLE,
            "unreliable" => Self::UNRELIABLE,
            "server" => Self::SERVER,
            "client" => Self::CLIENT,
            "const" => Self::CONST,
            "noexport" => Self::NO_EXPORT,
            "deprecated" => Self::DEPRECATED,
            _ => return None,
        };
        Some(flag)
    }
}

bitflags::bitflags! {
    /// Modifiers of states.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct StateFlags: u8 {
        const NONE      = 0;
        const AUTO      = 1 << 0;
        const SIMULATED = 1 << 1;
        /// `state()`: editable from the editor.
        const EDITABLE  = 1 << 2;
    }
}

impl StateFlags {
    pub fn from_keyword(text: &str) -> Option<Self> {
        let flag = match text.to_ascii_lowercase().as_str() {
            "auto" => Self::AUTO,
            "simulated" => Self::SIMULATED,
            _ => return None,
        };
        Some(flag)
    }
}

bitflags::bitflags! {
    /// Modifiers of structs.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct StructFlags: u8 {
        const NONE            = 0;
        const NATIVE          = 1 << 0;
        const EXPORT          = 1 << 1;
        const TRANSIENT       = 1 << 2;
        const IMMUTABLE       = 1 << 3;
        const ATOMIC          = 1 << 4;
        const STRICT_CONFIG   = 1 << 5;
    }
}

impl StructFlags {
    pub fn from_keyword(text: &str) -> Option<Self> {
        let flag = match text.to_ascii_lowercase().as_str() {
            "native" => Self::NATIVE,
            "export" => Self::EXPORT,
            "transient" => Self::TRANSIENT,
            "immutable" => Self::IMMUTABLE,
            "atomic" => Self::ATOMIC,
            "strictconfig" => Self::STRICT_CONFIG,
            _ => return None,
        };
        Some(flag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_lookup_ignores_case() {
        assert_eq!(ClassFlags::from_keyword("PerObjectConfig"), Some(ClassFlags::PER_OBJECT_CONFIG));
        assert_eq!(VarFlags::from_keyword("GlobalConfig"), Some(VarFlags::GLOBAL_CONFIG));
        assert_eq!(FunctionFlags::kind_from_keyword("Event"), Some(FunctionFlags::EVENT));
        assert_eq!(FunctionFlags::from_keyword("function"), None);
    }

    #[test]
    fn kind_mask_covers_every_kind_keyword() {
        for kw in ["function", "event", "operator", "preoperator", "postoperator", "delegate"] {
            let flag = FunctionFlags::kind_from_keyword(kw).unwrap_or(FunctionFlags::NONE);
            assert!(FunctionFlags::KIND.contains(flag), "{kw}");
        }
    }
}

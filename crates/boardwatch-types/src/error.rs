//! Encoding errors.

/// Which symbol table a lookup failed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    /// A piece name such as `pawn` or `KNIGHT`.
    Piece,
    /// A square coordinate such as `e4` or `A1`.
    Square,
}

impl core::fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Piece => f.write_str("piece"),
            Self::Square => f.write_str("square"),
        }
    }
}

/// A move could not be translated into its wire form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodeError {
    /// The name is outside the fixed piece or square table.
    #[error("unknown {kind} symbol: {symbol:?}")]
    UnknownSymbol {
        /// The table the lookup was made against.
        kind: SymbolKind,
        /// The offending input, as submitted.
        symbol: String,
    },
}

impl EncodeError {
    pub(crate) fn piece(symbol: &str) -> Self {
        Self::UnknownSymbol {
            kind: SymbolKind::Piece,
            symbol: symbol.to_owned(),
        }
    }

    pub(crate) fn square(symbol: &str) -> Self {
        Self::UnknownSymbol {
            kind: SymbolKind::Square,
            symbol: symbol.to_owned(),
        }
    }
}

//! Typed view of coprocessor events.
//!
//! Every event the coprocessor emits for a homomorphic operation decodes into
//! one [`FheOperation`] variant. Argument positions follow the event ABI, with
//! position 0 always holding the caller address.

use crate::error::HcuError;
use crate::types::{ArgValue, DecodedEvent, Handle};

/// Unary operators, priced by the type of their operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Neg,
}

impl UnaryOp {
    pub const ALL: [UnaryOp; 2] = [UnaryOp::Not, UnaryOp::Neg];

    pub fn price_key(self) -> &'static str {
        match self {
            UnaryOp::Not => "fheNot",
            UnaryOp::Neg => "fheNeg",
        }
    }
}

/// Binary operators, priced by result type and right operand shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
    Rotl,
    Rotr,
    Eq,
    Ne,
    Ge,
    Gt,
    Le,
    Lt,
    Min,
    Max,
}

impl BinaryOp {
    pub const ALL: [BinaryOp; 20] = [
        BinaryOp::Add,
        BinaryOp::Sub,
        BinaryOp::Mul,
        BinaryOp::Div,
        BinaryOp::Rem,
        BinaryOp::BitAnd,
        BinaryOp::BitOr,
        BinaryOp::BitXor,
        BinaryOp::Shl,
        BinaryOp::Shr,
        BinaryOp::Rotl,
        BinaryOp::Rotr,
        BinaryOp::Eq,
        BinaryOp::Ne,
        BinaryOp::Ge,
        BinaryOp::Gt,
        BinaryOp::Le,
        BinaryOp::Lt,
        BinaryOp::Min,
        BinaryOp::Max,
    ];

    pub fn price_key(self) -> &'static str {
        match self {
            BinaryOp::Add => "fheAdd",
            BinaryOp::Sub => "fheSub",
            BinaryOp::Mul => "fheMul",
            BinaryOp::Div => "fheDiv",
            BinaryOp::Rem => "fheRem",
            BinaryOp::BitAnd => "fheBitAnd",
            BinaryOp::BitOr => "fheBitOr",
            BinaryOp::BitXor => "fheBitXor",
            BinaryOp::Shl => "fheShl",
            BinaryOp::Shr => "fheShr",
            BinaryOp::Rotl => "fheRotl",
            BinaryOp::Rotr => "fheRotr",
            BinaryOp::Eq => "fheEq",
            BinaryOp::Ne => "fheNe",
            BinaryOp::Ge => "fheGe",
            BinaryOp::Gt => "fheGt",
            BinaryOp::Le => "fheLe",
            BinaryOp::Lt => "fheLt",
            BinaryOp::Min => "fheMin",
            BinaryOp::Max => "fheMax",
        }
    }
}

/// Random value generators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RandOp {
    Unbounded,
    Bounded,
}

impl RandOp {
    pub fn price_key(self) -> &'static str {
        match self {
            RandOp::Unbounded => "fheRand",
            RandOp::Bounded => "fheRandBounded",
        }
    }
}

/// Right operand of a binary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RightOperand {
    /// Plaintext literal, with no upstream cost.
    Scalar,
    /// Encrypted value produced upstream.
    Handle(Handle),
}

/// How the price of an operator is keyed in the price table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceKind {
    /// One table keyed by type.
    ByType,
    /// A scalar table and a non-scalar table, both keyed by type.
    ByShape,
}

/// Price key of trivial construction events.
pub const TRIVIAL_ENCRYPT_PRICE_KEY: &str = "trivialEncrypt";
/// Price key of cast events.
pub const CAST_PRICE_KEY: &str = "cast";
/// Price key of encrypted select events.
pub const IF_THEN_ELSE_PRICE_KEY: &str = "ifThenElse";

/// Every price key the engine may look up, with how it is keyed.
pub fn price_keys() -> Vec<(&'static str, PriceKind)> {
    let mut keys = vec![
        (TRIVIAL_ENCRYPT_PRICE_KEY, PriceKind::ByType),
        (CAST_PRICE_KEY, PriceKind::ByType),
        (IF_THEN_ELSE_PRICE_KEY, PriceKind::ByType),
        (RandOp::Unbounded.price_key(), PriceKind::ByType),
        (RandOp::Bounded.price_key(), PriceKind::ByType),
    ];
    keys.extend(UnaryOp::ALL.map(|op| (op.price_key(), PriceKind::ByType)));
    keys.extend(BinaryOp::ALL.map(|op| (op.price_key(), PriceKind::ByShape)));
    keys
}

/// A homomorphic operation recovered from a coprocessor event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FheOperation {
    /// Encryption of a plaintext, with no upstream handle.
    TrivialEncrypt { fhe_type: u32, result: Handle },
    /// Fresh random value, with no upstream handle.
    Rand {
        op: RandOp,
        fhe_type: u32,
        result: Handle,
    },
    /// Conversion of `input` to another type.
    Cast { input: Handle, result: Handle },
    Unary {
        op: UnaryOp,
        input: Handle,
        result: Handle,
    },
    Binary {
        op: BinaryOp,
        lhs: Handle,
        rhs: RightOperand,
        result: Handle,
    },
    /// Encrypted select between `if_true` and `if_false`.
    IfThenElse {
        control: Handle,
        if_true: Handle,
        if_false: Handle,
        result: Handle,
    },
}

/// Positional accessor over the arguments of one event.
struct EventArgs<'a> {
    event: &'a DecodedEvent,
}

impl EventArgs<'_> {
    fn malformed(&self, position: usize, reason: impl Into<String>) -> HcuError {
        HcuError::MalformedArgument {
            operation: self.event.name.clone(),
            position,
            reason: reason.into(),
        }
    }

    fn arg(&self, position: usize) -> Result<&ArgValue, HcuError> {
        self.event.args.get(position).ok_or_else(|| {
            self.malformed(
                position,
                format!("event has only {} arguments", self.event.args.len()),
            )
        })
    }

    fn handle(&self, position: usize) -> Result<Handle, HcuError> {
        let arg = self.arg(position)?;
        arg.as_handle()
            .ok_or_else(|| self.malformed(position, format!("{arg} is not a 32-byte handle")))
    }

    /// Registry membership is checked when pricing, so any value up to
    /// `u32::MAX` decodes here.
    fn type_index(&self, position: usize) -> Result<u32, HcuError> {
        let arg = self.arg(position)?;
        arg.as_u32()
            .ok_or_else(|| self.malformed(position, format!("{arg} is not a type index")))
    }

    /// Only `0x00` (non-scalar) and `0x01` (scalar) are accepted. Any other
    /// value is rejected rather than read as non-scalar.
    fn scalar_flag(&self, position: usize) -> Result<bool, HcuError> {
        match self.arg(position)?.as_u8() {
            Some(0) => Ok(false),
            Some(1) => Ok(true),
            _ => Err(self.malformed(position, "scalar flag must be 0x00 or 0x01")),
        }
    }
}

impl FheOperation {
    /// Decode a coprocessor event into its operator family.
    pub fn decode(event: &DecodedEvent) -> Result<Self, HcuError> {
        let args = EventArgs { event };
        let operation = match event.name.as_str() {
            "TrivialEncrypt" | "TrivialEncryptBytes" => FheOperation::TrivialEncrypt {
                fhe_type: args.type_index(2)?,
                result: args.handle(3)?,
            },
            "FheRand" => FheOperation::Rand {
                op: RandOp::Unbounded,
                fhe_type: args.type_index(1)?,
                result: args.handle(3)?,
            },
            "FheRandBounded" => FheOperation::Rand {
                op: RandOp::Bounded,
                fhe_type: args.type_index(2)?,
                result: args.handle(4)?,
            },
            "Cast" => FheOperation::Cast {
                input: args.handle(1)?,
                result: args.handle(3)?,
            },
            "FheNot" => Self::unary(UnaryOp::Not, &args)?,
            "FheNeg" => Self::unary(UnaryOp::Neg, &args)?,
            "FheIfThenElse" => FheOperation::IfThenElse {
                control: args.handle(1)?,
                if_true: args.handle(2)?,
                if_false: args.handle(3)?,
                result: args.handle(4)?,
            },
            name => match binary_op(name) {
                Some(op) => Self::binary(op, &args)?,
                None => return Err(HcuError::UnhandledOperation(name.to_string())),
            },
        };
        Ok(operation)
    }

    fn unary(op: UnaryOp, args: &EventArgs<'_>) -> Result<Self, HcuError> {
        Ok(FheOperation::Unary {
            op,
            input: args.handle(1)?,
            result: args.handle(2)?,
        })
    }

    fn binary(op: BinaryOp, args: &EventArgs<'_>) -> Result<Self, HcuError> {
        let rhs = if args.scalar_flag(3)? {
            RightOperand::Scalar
        } else {
            RightOperand::Handle(args.handle(2)?)
        };
        Ok(FheOperation::Binary {
            op,
            lhs: args.handle(1)?,
            rhs,
            result: args.handle(4)?,
        })
    }

    /// Handle produced by the operation.
    pub fn result(&self) -> Handle {
        match *self {
            FheOperation::TrivialEncrypt { result, .. }
            | FheOperation::Rand { result, .. }
            | FheOperation::Cast { result, .. }
            | FheOperation::Unary { result, .. }
            | FheOperation::Binary { result, .. }
            | FheOperation::IfThenElse { result, .. } => result,
        }
    }

    /// Handles the result depends on. Scalar right operands are not handles.
    pub fn parents(&self) -> Vec<Handle> {
        match *self {
            FheOperation::TrivialEncrypt { .. } | FheOperation::Rand { .. } => Vec::new(),
            FheOperation::Cast { input, .. } | FheOperation::Unary { input, .. } => vec![input],
            FheOperation::Binary { lhs, rhs, .. } => match rhs {
                RightOperand::Scalar => vec![lhs],
                RightOperand::Handle(rhs) => vec![lhs, rhs],
            },
            FheOperation::IfThenElse {
                control,
                if_true,
                if_false,
                ..
            } => vec![control, if_true, if_false],
        }
    }

    /// Key of the operation in the price table.
    pub fn price_key(&self) -> &'static str {
        match self {
            FheOperation::TrivialEncrypt { .. } => TRIVIAL_ENCRYPT_PRICE_KEY,
            FheOperation::Rand { op, .. } => op.price_key(),
            FheOperation::Cast { .. } => CAST_PRICE_KEY,
            FheOperation::Unary { op, .. } => op.price_key(),
            FheOperation::Binary { op, .. } => op.price_key(),
            FheOperation::IfThenElse { .. } => IF_THEN_ELSE_PRICE_KEY,
        }
    }
}

fn binary_op(name: &str) -> Option<BinaryOp> {
    let op = match name {
        "FheAdd" => BinaryOp::Add,
        "FheSub" => BinaryOp::Sub,
        "FheMul" => BinaryOp::Mul,
        "FheDiv" => BinaryOp::Div,
        "FheRem" => BinaryOp::Rem,
        "FheBitAnd" => BinaryOp::BitAnd,
        "FheBitOr" => BinaryOp::BitOr,
        "FheBitXor" => BinaryOp::BitXor,
        "FheShl" => BinaryOp::Shl,
        "FheShr" => BinaryOp::Shr,
        "FheRotl" => BinaryOp::Rotl,
        "FheRotr" => BinaryOp::Rotr,
        "FheEq" | "FheEqBytes" => BinaryOp::Eq,
        "FheNe" | "FheNeBytes" => BinaryOp::Ne,
        "FheGe" => BinaryOp::Ge,
        "FheGt" => BinaryOp::Gt,
        "FheLe" => BinaryOp::Le,
        "FheLt" => BinaryOp::Lt,
        "FheMin" => BinaryOp::Min,
        "FheMax" => BinaryOp::Max,
        _ => return None,
    };
    Some(op)
}

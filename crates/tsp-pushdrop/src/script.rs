//! PushDrop locking scripts.
//!
//! A PushDrop output is a pay-to-pubkey lock followed by data pushes that are dropped again
//! before the script ends:
//!
//! ```text
//! <locking pubkey> OP_CHECKSIG <field 0> ... <field n-1> OP_2DROP ... [OP_DROP]
//! ```
//!
//! Fields are pushed minimally, so one-byte values 1..=16 and 0x81 show up as
//! `OP_1..OP_16` / `OP_1NEGATE` instead of data pushes.

use bitcoin::opcodes::Opcode;
use bitcoin::opcodes::all::{OP_2DROP, OP_CHECKSIG, OP_DROP, OP_PUSHNUM_1, OP_PUSHNUM_16, OP_PUSHNUM_NEG1};
use bitcoin::script::{Builder, Instruction, PushBytesBuf, Script, ScriptBuf};

use tsp_core::ports::DecodeError;

/// Byte a minimally encoded `OP_1NEGATE` field stands for.
const NEGATIVE_ONE: u8 = 0x81;

/// A decoded PushDrop script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushDrop {
  pub locking_public_key: Vec<u8>,
  pub fields: Vec<Vec<u8>>,
}

impl PushDrop {
  pub fn locking_public_key_hex(&self) -> String {
    hex::encode(&self.locking_public_key)
  }
}

#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
  #[error("push too large: {0}")]
  PushTooLarge(String),
}

pub fn decode_pushdrop(script: &[u8]) -> Result<PushDrop, DecodeError> {
  let mut instructions = Script::from_bytes(script).instructions();

  let locking_public_key = match instructions.next().transpose().map_err(script_error)? {
    Some(Instruction::PushBytes(key)) if !key.as_bytes().is_empty() => key.as_bytes().to_vec(),
    _ => return Err(DecodeError::MissingLockingKey),
  };

  match instructions.next().transpose().map_err(script_error)? {
    Some(Instruction::Op(OP_CHECKSIG)) => {}
    _ => return Err(DecodeError::NotPushDrop("locking key is not followed by OP_CHECKSIG".into())),
  }

  let mut fields = Vec::new();
  let mut dropped = 0usize;

  for instruction in instructions {
    match instruction.map_err(script_error)? {
      Instruction::Op(OP_DROP) => dropped += 1,
      Instruction::Op(OP_2DROP) => dropped += 2,
      _ if dropped > 0 => return Err(DecodeError::NotPushDrop("data pushed after drop opcodes".into())),
      Instruction::PushBytes(data) => fields.push(data.as_bytes().to_vec()),
      Instruction::Op(op) => match small_int_field(op) {
        Some(value) => fields.push(vec![value]),
        None => return Err(DecodeError::NotPushDrop(format!("unexpected opcode {op}"))),
      },
    }
  }

  if dropped != fields.len() {
    return Err(DecodeError::NotPushDrop(format!("{} fields pushed but {dropped} dropped", fields.len())));
  }

  Ok(PushDrop { locking_public_key, fields })
}

/// Builds a PushDrop locking script for `public_key` carrying `fields`.
pub fn lock_script(public_key: &[u8], fields: &[Vec<u8>]) -> Result<ScriptBuf, EncodeError> {
  let mut builder = Builder::new().push_slice(push_bytes(public_key)?).push_opcode(OP_CHECKSIG);

  for field in fields {
    builder = match field.as_slice() {
      [n @ 1..=16] => builder.push_opcode(Opcode::from(OP_PUSHNUM_1.to_u8() + n - 1)),
      [NEGATIVE_ONE] => builder.push_opcode(OP_PUSHNUM_NEG1),
      _ => builder.push_slice(push_bytes(field)?),
    };
  }

  for _ in 0..fields.len() / 2 {
    builder = builder.push_opcode(OP_2DROP);
  }
  if fields.len() % 2 == 1 {
    builder = builder.push_opcode(OP_DROP);
  }

  Ok(builder.into_script())
}

fn push_bytes(data: &[u8]) -> Result<PushBytesBuf, EncodeError> {
  PushBytesBuf::try_from(data.to_vec()).map_err(|e| EncodeError::PushTooLarge(e.to_string()))
}

fn small_int_field(op: Opcode) -> Option<u8> {
  if op == OP_PUSHNUM_NEG1 {
    return Some(NEGATIVE_ONE);
  }
  if (OP_PUSHNUM_1.to_u8()..=OP_PUSHNUM_16.to_u8()).contains(&op.to_u8()) {
    return Some(op.to_u8() - OP_PUSHNUM_1.to_u8() + 1);
  }
  None
}

fn script_error(err: bitcoin::script::Error) -> DecodeError {
  DecodeError::Script(err.to_string())
}

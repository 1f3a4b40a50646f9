//! Encodes/decodes one `Table_i` record (§6):
//! `signature_name_len | signature_name | param_count | type_sig[param_count]
//!  | entry_count | entries[entry_count] | has_tree(0/1) | tree? | strategy_tag`.

use jdc_dispatch::{DecisionTreeNode, DispatchEntry, DispatchStats, DispatchStrategy, DispatchTable, EntryFlags};
use jdc_types::TypeId;

use crate::format::{ByteReader, ByteWriter, DecodeError};

pub fn write_table(writer: &mut ByteWriter, table: &DispatchTable) {
    writer.write_string(&table.signature_name);
    writer.write_u32(table.parameter_count as u32);
    for &type_id in &table.type_signature {
        writer.write_u32(type_id.0);
    }

    writer.write_u32(table.entry_count as u32);
    for entry in &table.entries {
        writer.write_u64(entry.type_signature_key);
        writer.write_u32(entry.implementation_index);
        writer.write_u64(entry.frequency());
        writer.write_u32(entry.specificity_rank);
        writer.write_u32(entry.flags.bits());
    }

    match &table.decision_tree {
        None => writer.write_u8(0),
        Some(tree) => {
            writer.write_u8(1);
            write_tree(writer, tree);
        }
    }

    write_strategy(writer, table.strategy);
}

pub fn read_table(reader: &mut ByteReader) -> Result<DispatchTable, DecodeError> {
    let signature_name = reader.read_string()?;
    let parameter_count = reader.read_u32()? as usize;
    let mut type_signature = Vec::with_capacity(parameter_count);
    for _ in 0..parameter_count {
        type_signature.push(TypeId(reader.read_u32()?));
    }

    let entry_count = reader.read_u32()? as usize;
    let mut entries = Vec::with_capacity(entry_count);
    for _ in 0..entry_count {
        let type_signature_key = reader.read_u64()?;
        let implementation_index = reader.read_u32()?;
        let _stored_frequency = reader.read_u64()?; // counters reset on load (§8)
        let specificity_rank = reader.read_u32()?;
        let flags_bits = reader.read_u32()?;
        let mut entry = DispatchEntry::new(type_signature_key, implementation_index, specificity_rank);
        entry.flags = EntryFlags::from_bits_truncate(flags_bits);
        entries.push(entry);
    }

    let has_tree = reader.read_u8()?;
    let decision_tree = if has_tree == 0 { None } else { Some(read_tree(reader)?) };

    let strategy = read_strategy(reader)?;

    Ok(DispatchTable {
        signature_name,
        parameter_count,
        type_signature,
        entries,
        entry_count,
        decision_tree,
        strategy,
        stats: DispatchStats::default(),
    })
}

fn write_tree(writer: &mut ByteWriter, node: &DecisionTreeNode) {
    match (node.discriminator_type_index, node.discriminator_type_id, node.terminal) {
        (_, _, Some(index)) => {
            writer.write_u8(0);
            writer.write_u32(index);
        }
        (Some(param_index), Some(pivot), None) => {
            writer.write_u8(1);
            writer.write_u32(param_index as u32);
            writer.write_u32(pivot.0);
            write_tree(writer, node.left.as_ref().expect("internal node has a left child"));
            write_tree(writer, node.right.as_ref().expect("internal node has a right child"));
        }
        _ => {
            writer.write_u8(2);
            writer.write_u32(node.fallback_indices.len() as u32);
            for &index in &node.fallback_indices {
                writer.write_u32(index);
            }
        }
    }
}

fn read_tree(reader: &mut ByteReader) -> Result<DecisionTreeNode, DecodeError> {
    match reader.read_u8()? {
        0 => {
            let index = reader.read_u32()?;
            Ok(DecisionTreeNode::leaf(index))
        }
        1 => {
            let param_index = reader.read_u32()? as usize;
            let pivot = TypeId(reader.read_u32()?);
            let left = read_tree(reader)?;
            let right = read_tree(reader)?;
            Ok(DecisionTreeNode {
                discriminator_type_index: Some(param_index),
                discriminator_type_id: Some(pivot),
                left: Some(Box::new(left)),
                right: Some(Box::new(right)),
                terminal: None,
                fallback_indices: Vec::new(),
            })
        }
        _ => {
            let count = reader.read_u32()? as usize;
            let mut fallback_indices = Vec::with_capacity(count);
            for _ in 0..count {
                fallback_indices.push(reader.read_u32()?);
            }
            Ok(DecisionTreeNode::degenerate(fallback_indices))
        }
    }
}

fn write_strategy(writer: &mut ByteWriter, strategy: DispatchStrategy) {
    match strategy {
        DispatchStrategy::StaticDirect => writer.write_u8(0),
        DispatchStrategy::SwitchTable => writer.write_u8(1),
        DispatchStrategy::PerfectHash { seed } => {
            writer.write_u8(2);
            writer.write_u64(seed);
        }
        DispatchStrategy::InlineCache => writer.write_u8(3),
    }
}

fn read_strategy(reader: &mut ByteReader) -> Result<DispatchStrategy, DecodeError> {
    match reader.read_u8()? {
        0 => Ok(DispatchStrategy::StaticDirect),
        1 => Ok(DispatchStrategy::SwitchTable),
        2 => Ok(DispatchStrategy::PerfectHash { seed: reader.read_u64()? }),
        3 => Ok(DispatchStrategy::InlineCache),
        _ => Err(DecodeError::BadMagic),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jdc_dispatch::DispatchTableBuilder;
    use jdc_resolve::{FunctionId, Implementation};
    use jdc_common::Span;

    fn implementation(params: Vec<TypeId>) -> Implementation {
        Implementation {
            function_id: FunctionId { name: "f".into(), module: "m".into(), disambiguator: 0 },
            param_type_ids: params,
            return_type_id: TypeId::I32,
            effects: Vec::new(),
            specificity_rank: 100,
            source_span: Span::dummy(),
        }
    }

    #[test]
    fn round_trips_entry_count_and_signature_name() {
        let builder = DispatchTableBuilder::new(8);
        let implementations = vec![implementation(vec![TypeId::I32]), implementation(vec![TypeId::F64])];
        let table = builder.build("f", &implementations).unwrap();

        let mut writer = ByteWriter::new();
        write_table(&mut writer, &table);
        let bytes = writer.into_bytes();

        let mut reader = ByteReader::new(&bytes);
        let decoded = read_table(&mut reader).unwrap();

        assert_eq!(decoded.signature_name, table.signature_name);
        assert_eq!(decoded.entry_count, table.entry_count);
        assert_eq!(decoded.type_signature, table.type_signature);
    }

    #[test]
    fn round_trips_a_decision_tree() {
        let builder = DispatchTableBuilder::new(2);
        let implementations: Vec<_> = (0..4).map(|i| implementation(vec![TypeId(i + 5)])).collect();
        let table = builder.build("f", &implementations).unwrap();
        assert!(table.decision_tree.is_some());

        let mut writer = ByteWriter::new();
        write_table(&mut writer, &table);
        let bytes = writer.into_bytes();
        let decoded = read_table(&mut ByteReader::new(&bytes)).unwrap();
        assert!(decoded.decision_tree.is_some());
    }

    #[test]
    fn round_trips_a_degenerate_node_without_losing_its_fallback_indices() {
        let node = DecisionTreeNode::degenerate(vec![3, 7, 9]);

        let mut writer = ByteWriter::new();
        write_tree(&mut writer, &node);
        let bytes = writer.into_bytes();
        let decoded = read_tree(&mut ByteReader::new(&bytes)).unwrap();

        assert_eq!(decoded.fallback_indices, vec![3, 7, 9]);
        assert!(decoded.terminal.is_none());
    }
}

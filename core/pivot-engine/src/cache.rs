//! FILENAME: core/pivot-engine/src/cache.rs
//! Grouping Cache - Value interning, group keys and accumulators.
//!
//! Architecture:
//! - Each distinct dimension value is stored once per field and referenced by id
//! - A group key is the vector of ids for the row's dimension values, so
//!   no separator token can ever collide with real data
//! - Groups remember the order in which they were first seen

use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;

use engine::Value;

use crate::definition::AggregationType;

// ============================================================================
// VALUE INTERNING
// ============================================================================

/// A reference to an interned value within a field's unique value store.
pub type ValueId = u32;

/// Represents a null or absent value. Distinct from the empty string.
pub const VALUE_ID_EMPTY: ValueId = u32::MAX;

/// Wrapper around f64 that implements Eq and Hash for use in hash sets.
/// NaN values are treated as equal to each other, and so are 0 and -0.
#[derive(Debug, Clone, Copy)]
pub struct OrderedFloat(pub f64);

impl PartialEq for OrderedFloat {
    fn eq(&self, other: &Self) -> bool {
        if self.0.is_nan() && other.0.is_nan() {
            true
        } else {
            self.0 == other.0
        }
    }
}

impl Eq for OrderedFloat {}

impl std::hash::Hash for OrderedFloat {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        if self.0.is_nan() {
            u64::MAX.hash(state);
        } else if self.0 == 0.0 {
            0u64.hash(state);
        } else {
            self.0.to_bits().hash(state);
        }
    }
}

/// Unique value store for one grouping field.
///
/// Values are interned by their string coercion, so `1` and `"1"` land in the
/// same group. The first raw value seen for an id is kept for output rows.
#[derive(Debug, Clone, Default)]
pub struct FieldCache {
    pub name: String,
    value_to_id: FxHashMap<String, ValueId>,
    id_to_value: Vec<Value>,
}

impl FieldCache {
    pub fn new(name: impl Into<String>) -> Self {
        FieldCache {
            name: name.into(),
            value_to_id: FxHashMap::default(),
            id_to_value: Vec::new(),
        }
    }

    /// Interns a value and returns its ValueId.
    pub fn intern(&mut self, value: &Value) -> ValueId {
        if value.is_missing() {
            return VALUE_ID_EMPTY;
        }
        let key = value.to_display_string();
        if let Some(&id) = self.value_to_id.get(&key) {
            return id;
        }
        let id = self.id_to_value.len() as ValueId;
        self.id_to_value.push(value.clone());
        self.value_to_id.insert(key, id);
        id
    }

    pub fn get_value(&self, id: ValueId) -> Option<&Value> {
        if id == VALUE_ID_EMPTY {
            return None;
        }
        self.id_to_value.get(id as usize)
    }

    pub fn unique_count(&self) -> usize {
        self.id_to_value.len()
    }
}

// ============================================================================
// GROUP KEY
// ============================================================================

/// A unique combination of dimension values.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupKey {
    pub values: SmallVec<[ValueId; 4]>,
}

impl GroupKey {
    pub fn new(values: SmallVec<[ValueId; 4]>) -> Self {
        GroupKey { values }
    }
}

/// A group of source rows sharing one `GroupKey`.
#[derive(Debug, Clone)]
pub struct Group {
    pub key: GroupKey,
    /// Indices into the source slice, in source order.
    pub rows: Vec<usize>,
}

/// Partitions rows into groups, emitting them in first-seen order.
#[derive(Debug, Clone)]
pub struct GroupIndex {
    fields: Vec<FieldCache>,
    lookup: FxHashMap<GroupKey, usize>,
    groups: Vec<Group>,
}

impl GroupIndex {
    pub fn new<S: AsRef<str>>(field_names: &[S]) -> Self {
        GroupIndex {
            fields: field_names.iter().map(|n| FieldCache::new(n.as_ref())).collect(),
            lookup: FxHashMap::default(),
            groups: Vec::new(),
        }
    }

    /// Assigns the row at `row_index` to its group. `values` must yield one
    /// value per field, in field order. Returns the group's position.
    pub fn add_row<'a>(&mut self, row_index: usize, values: impl IntoIterator<Item = &'a Value>) -> usize {
        let ids: SmallVec<[ValueId; 4]> = self
            .fields
            .iter_mut()
            .zip(values)
            .map(|(field, value)| field.intern(value))
            .collect();
        let key = GroupKey::new(ids);

        if let Some(&pos) = self.lookup.get(&key) {
            self.groups[pos].rows.push(row_index);
            return pos;
        }
        let pos = self.groups.len();
        self.lookup.insert(key.clone(), pos);
        self.groups.push(Group {
            key,
            rows: vec![row_index],
        });
        pos
    }

    pub fn fields(&self) -> &[FieldCache] {
        &self.fields
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

// ============================================================================
// AGGREGATE ACCUMULATOR
// ============================================================================

/// Running state for one measure within one group.
#[derive(Debug, Clone, Default)]
pub struct AggregateAccumulator {
    pub sum: f64,
    /// Every row offered, numeric or not.
    pub count: u64,
    pub count_numbers: u64,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub first: Option<f64>,
    distinct: Option<FxHashSet<OrderedFloat>>,
}

impl AggregateAccumulator {
    pub fn new() -> Self {
        AggregateAccumulator::default()
    }

    /// Accumulator that also tracks the distinct numeric values.
    pub fn for_type(aggregation: AggregationType) -> Self {
        let mut acc = AggregateAccumulator::new();
        if aggregation == AggregationType::CountDistinct {
            acc.distinct = Some(FxHashSet::default());
        }
        acc
    }

    /// Offers one raw value. Missing and non-numeric values only count rows.
    pub fn add_value(&mut self, value: &Value) {
        match value.as_number() {
            Some(n) => self.add_number(n),
            None => self.count += 1,
        }
    }

    pub fn add_number(&mut self, value: f64) {
        self.count += 1;
        self.count_numbers += 1;
        self.sum += value;
        self.min = Some(self.min.map_or(value, |m| m.min(value)));
        self.max = Some(self.max.map_or(value, |m| m.max(value)));
        if self.first.is_none() {
            self.first = Some(value);
        }
        if let Some(distinct) = self.distinct.as_mut() {
            distinct.insert(OrderedFloat(value));
        }
    }

    /// Computes the final aggregate. `None` when no numeric value was seen,
    /// except for the two counting functions.
    pub fn compute(&self, aggregation: AggregationType) -> Option<f64> {
        match aggregation {
            AggregationType::Count => Some(self.count as f64),
            AggregationType::CountDistinct => {
                Some(self.distinct.as_ref().map_or(0, |set| set.len()) as f64)
            }
            _ if self.count_numbers == 0 => None,
            AggregationType::Sum => Some(self.sum),
            AggregationType::Avg => Some(self.sum / self.count_numbers as f64),
            AggregationType::Min => self.min,
            AggregationType::Max => self.max,
            AggregationType::None => self.first,
        }
    }
}

//! Betweenness problem instances.
//!
//! Variable names are interned to dense [`VarId`]s in first-appearance
//! order, so orderings and constraints work on integers and names are only
//! touched at the edges (parsing, checkpoints, output).

use std::collections::HashMap;
use std::fmt;

use tracing::warn;

use crate::error::{BetweennessError, Result};
use crate::ordering::Ordering;

/// Dense identifier of an interned variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(usize);

impl VarId {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for VarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A betweenness constraint `(a, b, c)`: `c` must not lie strictly
/// between `a` and `b`, in either direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Constraint {
    pub a: VarId,
    pub b: VarId,
    pub c: VarId,
}

impl Constraint {
    pub fn new(a: VarId, b: VarId, c: VarId) -> Self {
        Self { a, b, c }
    }

    /// The three variables in declaration order.
    pub fn vars(&self) -> [VarId; 3] {
        [self.a, self.b, self.c]
    }

    pub fn involves(&self, var: VarId) -> bool {
        self.a == var || self.b == var || self.c == var
    }
}

/// A loaded problem: the variable set and the ordered constraint list.
///
/// Constraint order is preserved exactly as given so that cost evaluation
/// visits constraints in the same order on every run.
#[derive(Debug, Clone)]
pub struct Instance {
    declared_variables: usize,
    names: Vec<String>,
    index: HashMap<String, VarId>,
    constraints: Vec<Constraint>,
    /// Constraint indices mentioning each variable, deduplicated.
    incidence: Vec<Vec<usize>>,
}

impl Instance {
    /// Builds an instance from an explicit variable list.
    ///
    /// # Errors
    ///
    /// - [`BetweennessError::InvalidInstance`] if a variable name repeats.
    /// - [`BetweennessError::InvalidConstraint`] if a constraint names a
    ///   variable outside the list.
    pub fn new<V, I, S>(variables: V, constraints: I) -> Result<Self>
    where
        V: IntoIterator,
        V::Item: Into<String>,
        I: IntoIterator<Item = [S; 3]>,
        S: AsRef<str>,
    {
        let mut names = Vec::new();
        let mut index = HashMap::new();
        for name in variables {
            let name: String = name.into();
            if index.contains_key(&name) {
                return Err(BetweennessError::InvalidInstance(format!(
                    "duplicate variable `{name}`"
                )));
            }
            index.insert(name.clone(), VarId(names.len()));
            names.push(name);
        }

        let mut resolved = Vec::new();
        for (i, triple) in constraints.into_iter().enumerate() {
            let mut ids = [VarId(0); 3];
            for (slot, token) in ids.iter_mut().zip(triple.iter()) {
                let token: &str = token.as_ref();
                *slot = *index
                    .get(token)
                    .ok_or_else(|| BetweennessError::InvalidConstraint {
                        constraint: i,
                        variable: token.to_string(),
                    })?;
            }
            resolved.push(Constraint::new(ids[0], ids[1], ids[2]));
        }

        let declared = names.len();
        Ok(Self::assemble(declared, names, index, resolved))
    }

    /// Builds an instance whose variable set is every name appearing in
    /// `constraints`, interned in first-appearance order.
    ///
    /// `declared_variables` is the count recorded by the source. More
    /// distinct names than declared is an error; fewer is tolerated with a
    /// warning, since a variable that appears in no constraint cannot be
    /// named by a constraint list.
    pub fn from_constraints<I, S>(declared_variables: usize, constraints: I) -> Result<Self>
    where
        I: IntoIterator<Item = [S; 3]>,
        S: AsRef<str>,
    {
        let mut names: Vec<String> = Vec::new();
        let mut index: HashMap<String, VarId> = HashMap::new();
        let mut resolved = Vec::new();

        for triple in constraints {
            let mut ids = [VarId(0); 3];
            for (slot, token) in ids.iter_mut().zip(triple.iter()) {
                let token: &str = token.as_ref();
                *slot = match index.get(token) {
                    Some(&id) => id,
                    None => {
                        let id = VarId(names.len());
                        index.insert(token.to_string(), id);
                        names.push(token.to_string());
                        id
                    }
                };
            }
            resolved.push(Constraint::new(ids[0], ids[1], ids[2]));
        }

        if names.len() > declared_variables {
            return Err(BetweennessError::InvalidInstance(format!(
                "{} distinct variables found, but {declared_variables} declared",
                names.len()
            )));
        }
        if names.len() < declared_variables {
            warn!(
                event = "variable_count_mismatch",
                declared = declared_variables,
                found = names.len(),
            );
        }

        Ok(Self::assemble(declared_variables, names, index, resolved))
    }

    fn assemble(
        declared_variables: usize,
        names: Vec<String>,
        index: HashMap<String, VarId>,
        constraints: Vec<Constraint>,
    ) -> Self {
        let mut incidence = vec![Vec::new(); names.len()];
        for (i, constraint) in constraints.iter().enumerate() {
            for var in constraint.vars() {
                let list: &mut Vec<usize> = &mut incidence[var.index()];
                if list.last() != Some(&i) {
                    list.push(i);
                }
            }
        }

        Self {
            declared_variables,
            names,
            index,
            constraints,
            incidence,
        }
    }

    /// Number of distinct variables known to the instance.
    pub fn num_variables(&self) -> usize {
        self.names.len()
    }

    /// Variable count as recorded by the source.
    pub fn declared_variables(&self) -> usize {
        self.declared_variables
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Constraints mentioning `var`, each listed once.
    pub fn constraints_of(&self, var: VarId) -> impl Iterator<Item = &Constraint> + '_ {
        self.incidence[var.index()]
            .iter()
            .map(move |&i| &self.constraints[i])
    }

    pub fn name(&self, var: VarId) -> &str {
        &self.names[var.index()]
    }

    pub fn id(&self, name: &str) -> Option<VarId> {
        self.index.get(name).copied()
    }

    /// Variables in first-appearance order.
    pub fn variables(&self) -> &[String] {
        &self.names
    }

    /// Starting permutation used when no checkpoint is available.
    pub fn default_ordering(&self) -> Ordering {
        Ordering::identity(self.names.len())
    }

    /// Converts a name sequence into an [`Ordering`] over this instance.
    ///
    /// # Errors
    ///
    /// [`BetweennessError::InvalidInstance`] unless `names` is a
    /// permutation of the instance variables.
    pub fn ordering_from_names<S: AsRef<str>>(&self, names: &[S]) -> Result<Ordering> {
        if names.len() != self.names.len() {
            return Err(BetweennessError::InvalidInstance(format!(
                "ordering has {} variables, instance has {}",
                names.len(),
                self.names.len()
            )));
        }
        let sequence = names
            .iter()
            .map(|name| {
                let name: &str = name.as_ref();
                self.id(name).ok_or_else(|| {
                    BetweennessError::InvalidInstance(format!(
                        "ordering names unknown variable `{name}`"
                    ))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ordering::from_sequence(sequence)
    }

    /// Names of `ordering` in sequence order.
    pub fn names_of(&self, ordering: &Ordering) -> Vec<String> {
        ordering
            .iter()
            .map(|var| self.names[var.index()].clone())
            .collect()
    }

    /// Counts violated constraints for an ordering given by name.
    ///
    /// # Errors
    ///
    /// [`BetweennessError::InvalidConstraint`] if a constraint names a
    /// variable missing from `names`.
    pub fn cost_of_names<S: AsRef<str>>(&self, names: &[S]) -> Result<usize> {
        let positions: HashMap<&str, usize> = names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.as_ref(), i))
            .collect();

        let mut satisfied = 0;
        for (i, constraint) in self.constraints.iter().enumerate() {
            let mut pos = [0usize; 3];
            for (slot, var) in pos.iter_mut().zip(constraint.vars()) {
                let name = self.name(var);
                *slot = *positions
                    .get(name)
                    .ok_or_else(|| BetweennessError::InvalidConstraint {
                        constraint: i,
                        variable: name.to_string(),
                    })?;
            }
            if !crate::cost::strictly_between(pos[0], pos[1], pos[2]) {
                satisfied += 1;
            }
        }
        Ok(self.constraints.len() - satisfied)
    }
}

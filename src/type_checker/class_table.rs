use std::collections::HashMap;

use crate::{
    ast::ast::{Class, Method},
    errors::errors::{DiagnosticSink, ErrorImpl},
    symbol::symbol::{Symbol, BOOL, INT, NO_CLASS, OBJECT, SELF_TYPE, STRING},
};

use super::builtins::install_basic_classes;

/// Classes that may not appear as a parent.
const UNINHERITABLE: [Symbol; 4] = [INT, BOOL, STRING, SELF_TYPE];

/// Class Table
///
/// Every class of the program, built-ins first, plus the inheritance edges
/// that survived validation. Frozen once built; all queries take concrete
/// class names, so SELF_TYPE must be resolved by the caller.
#[derive(Debug)]
pub struct ClassTable {
    classes: Vec<Class>,
    /// First declaration of each name.
    indices: HashMap<Symbol, usize>,
    /// Parent index per class, for edges that were not reported as errors.
    edges: Vec<Option<usize>>,
    builtin_count: usize,
}

impl ClassTable {
    /// Installs the built-in classes, appends `user_classes` and reports
    /// duplicate names, undefined parents and illegal parents.
    pub fn build(user_classes: &[Class], diagnostics: &mut DiagnosticSink) -> ClassTable {
        let mut classes = install_basic_classes();
        let builtin_count = classes.len();
        classes.extend(user_classes.iter().cloned());

        let mut indices = HashMap::new();
        for (index, class) in classes.iter().enumerate() {
            if indices.contains_key(&class.name) {
                diagnostics.report(
                    ErrorImpl::ClassRedefined { class: class.name },
                    class.get_position(),
                );
            } else {
                indices.insert(class.name, index);
            }
        }

        let mut edges = vec![None; classes.len()];
        for (index, class) in classes.iter().enumerate() {
            if class.parent == NO_CLASS {
                continue;
            }

            if UNINHERITABLE.contains(&class.parent) {
                diagnostics.report(
                    ErrorImpl::IllegalInheritance {
                        class: class.name,
                        parent: class.parent,
                    },
                    class.get_position(),
                );
                continue;
            }

            match indices.get(&class.parent) {
                Some(parent) => edges[index] = Some(*parent),
                None => diagnostics.report(
                    ErrorImpl::UndefinedParent {
                        class: class.name,
                        parent: class.parent,
                    },
                    class.get_position(),
                ),
            }
        }

        log::debug!(
            "class table built: {} built-in, {} user classes",
            builtin_count,
            user_classes.len()
        );

        ClassTable {
            classes,
            indices,
            edges,
            builtin_count,
        }
    }

    /// Reports every class the root cannot reach, i.e. every class on or
    /// below an inheritance cycle. Returns whether the hierarchy is sound.
    ///
    /// Classes on a cycle come first, then their descendants by distance to
    /// the cycle, so the report runs from least to most specific.
    pub fn validate_acyclic(&self, diagnostics: &mut DiagnosticSink) -> bool {
        let count = self.classes.len();
        let mut children = vec![vec![]; count];
        for (child, parent) in self.edges.iter().enumerate() {
            if let Some(parent) = parent {
                children[*parent].push(child);
            }
        }

        let mut visited = vec![false; count];
        let mut to_visit = vec![];
        if let Some(root) = self.indices.get(&OBJECT) {
            to_visit.push(*root);
        }
        while let Some(current) = to_visit.pop() {
            if visited[current] {
                continue;
            }
            visited[current] = true;
            to_visit.extend(children[current].iter().filter(|child| !visited[**child]));
        }

        let unreached: Vec<usize> = (0..count).filter(|index| !visited[*index]).collect();
        if unreached.is_empty() {
            return true;
        }

        let on_cycle: Vec<bool> = (0..count)
            .map(|index| !visited[index] && self.returns_to_itself(index))
            .collect();

        let mut ordered: Vec<(usize, usize)> = unreached
            .iter()
            .map(|index| (self.distance_to_cycle(*index, &on_cycle), *index))
            .collect();
        // Nearest the cycle first; later declarations first within a level.
        ordered.sort_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)));

        for (_, index) in ordered {
            let class = &self.classes[index];
            diagnostics.report(
                ErrorImpl::InheritanceCycle { class: class.name },
                class.get_position(),
            );
        }

        false
    }

    fn returns_to_itself(&self, start: usize) -> bool {
        let mut current = self.edges[start];
        for _ in 0..self.classes.len() {
            match current {
                Some(index) if index == start => return true,
                Some(index) => current = self.edges[index],
                None => return false,
            }
        }
        false
    }

    fn distance_to_cycle(&self, start: usize, on_cycle: &[bool]) -> usize {
        let mut current = start;
        let mut distance = 0;
        while !on_cycle[current] && distance < self.classes.len() {
            match self.edges[current] {
                Some(parent) => current = parent,
                None => break,
            }
            distance += 1;
        }
        distance
    }

    pub fn lookup(&self, name: Symbol) -> Option<&Class> {
        self.indices.get(&name).map(|index| &self.classes[*index])
    }

    pub fn contains(&self, name: Symbol) -> bool {
        self.indices.contains_key(&name)
    }

    pub fn classes(&self) -> &[Class] {
        &self.classes
    }

    pub fn user_classes(&self) -> &[Class] {
        &self.classes[self.builtin_count..]
    }

    /// `name` followed by each of its ancestors up to the root. Empty for an
    /// unknown class. Bounded by the class count so a cyclic table still
    /// terminates.
    pub fn ancestors(&self, name: Symbol) -> Vec<Symbol> {
        let mut chain = vec![];
        let mut current = self.lookup(name);
        while let Some(class) = current {
            if chain.len() > self.classes.len() {
                break;
            }
            chain.push(class.name);
            current = if class.parent == NO_CLASS {
                None
            } else {
                self.lookup(class.parent)
            };
        }
        chain
    }

    /// Reflexive, transitive subclass relation. Everything conforms to the
    /// root.
    pub fn conforms_to(&self, sub: Symbol, sup: Symbol) -> bool {
        sub == sup || sup == OBJECT || self.ancestors(sub).contains(&sup)
    }

    /// Most specific class that both `a` and `b` inherit from.
    pub fn least_upper_bound(&self, a: Symbol, b: Symbol) -> Symbol {
        let chain = self.ancestors(a);
        self.ancestors(b)
            .into_iter()
            .find(|ancestor| chain.contains(ancestor))
            .unwrap_or(OBJECT)
    }

    /// The nearest definition of `method` on `class_name` or its ancestors.
    pub fn find_method(&self, class_name: Symbol, method: Symbol) -> Option<&Method> {
        self.ancestors(class_name)
            .into_iter()
            .filter_map(|name| self.lookup(name))
            .find_map(|class| class.get_method(method))
    }
}

use std::collections::{BTreeSet, HashMap};

use crate::module_system::descriptor::ModuleDescriptor;
use crate::module_system::error::ModuleSystemError;
use crate::module_system::registry::ModuleRegistry;
use crate::module_system::scan::ScanTarget;

/// Resolve the descriptors a scan must visit, dependencies first.
///
/// `ScanTarget::One` selects the target and everything it transitively depends
/// on; `ScanTarget::All` selects the whole registry. Among modules that are
/// ready at the same time, registration order wins, so the result is stable.
pub fn resolve_install_order<'a>(
    registry: &'a ModuleRegistry,
    target: &ScanTarget,
) -> Result<Vec<&'a ModuleDescriptor>, ModuleSystemError> {
    let selected = select(registry, target)?;
    let descriptors = registry.descriptors();

    let mut in_degree: HashMap<usize, usize> = selected.iter().map(|&idx| (idx, 0)).collect();
    let mut dependents: HashMap<usize, Vec<usize>> = HashMap::new();
    for &idx in &selected {
        for dep_uid in &descriptors[idx].dependencies {
            let dep = dependency_position(registry, &descriptors[idx], dep_uid)?;
            *in_degree.entry(idx).or_insert(0) += 1;
            dependents.entry(dep).or_default().push(idx);
        }
    }

    // Kahn's algorithm; a BTreeSet keeps ties in registration order
    let mut ready: BTreeSet<usize> = in_degree
        .iter()
        .filter(|(_, degree)| **degree == 0)
        .map(|(idx, _)| *idx)
        .collect();
    let mut order = Vec::with_capacity(selected.len());
    while let Some(idx) = ready.pop_first() {
        order.push(idx);
        for dependent in dependents.get(&idx).into_iter().flatten() {
            if let Some(degree) = in_degree.get_mut(dependent) {
                *degree -= 1;
                if *degree == 0 {
                    ready.insert(*dependent);
                }
            }
        }
    }

    if order.len() != selected.len() {
        let cycle: Vec<String> = selected
            .iter()
            .filter(|idx| !order.contains(idx))
            .map(|idx| descriptors[*idx].uid.clone())
            .collect();
        return Err(ModuleSystemError::CyclicDependency(cycle));
    }

    Ok(order.into_iter().map(|idx| &descriptors[idx]).collect())
}

fn select(registry: &ModuleRegistry, target: &ScanTarget) -> Result<BTreeSet<usize>, ModuleSystemError> {
    match target {
        ScanTarget::All => Ok((0..registry.len()).collect()),
        ScanTarget::One(uid) => {
            let root = registry
                .position(uid)
                .ok_or_else(|| ModuleSystemError::not_found(uid.as_str()))?;
            let mut selected = BTreeSet::new();
            let mut stack = vec![root];
            while let Some(idx) = stack.pop() {
                if !selected.insert(idx) {
                    continue;
                }
                let descriptor = &registry.descriptors()[idx];
                for dep_uid in &descriptor.dependencies {
                    stack.push(dependency_position(registry, descriptor, dep_uid)?);
                }
            }
            Ok(selected)
        }
    }
}

fn dependency_position(
    registry: &ModuleRegistry,
    descriptor: &ModuleDescriptor,
    dep_uid: &str,
) -> Result<usize, ModuleSystemError> {
    registry
        .position(dep_uid)
        .ok_or_else(|| ModuleSystemError::MissingDependency {
            uid: descriptor.uid.clone(),
            dependency: dep_uid.to_string(),
        })
}

use crate::{
    error::MemberError,
    ports::{EntryStore, MemberRegistry},
};
use tripsplit_domain::MemberName;

/// Beneficiary lists are persisted joined by this character.
pub const NAME_SEPARATOR: char = ',';

/// Maintains the member registry.
///
/// Removing a member never touches recorded entries; their share keeps showing
/// up in balances under the old name. Renaming rewrites entries so history
/// follows the member.
pub struct MemberService<'a> {
    registry: &'a dyn MemberRegistry,
    store: &'a dyn EntryStore,
}

impl<'a> MemberService<'a> {
    pub fn new(registry: &'a dyn MemberRegistry, store: &'a dyn EntryStore) -> Self {
        Self { registry, store }
    }

    pub fn members(&self) -> Result<Vec<MemberName>, MemberError> {
        Ok(self.registry.members()?)
    }

    pub fn add(&self, name: &str) -> Result<MemberName, MemberError> {
        let name = normalized(name)?;
        let mut members = self.registry.members()?;
        if members.contains(&name) {
            return Err(MemberError::AlreadyMember(name));
        }
        members.push(name.clone());
        self.registry.save_members(&members)?;
        tracing::info!(member = %name, member_count = members.len(), "Added member");
        Ok(name)
    }

    pub fn remove(&self, name: &str) -> Result<MemberName, MemberError> {
        let mut members = self.registry.members()?;
        let Some(index) = members.iter().position(|member| member.as_str() == name) else {
            return Err(MemberError::NotAMember(name.into()));
        };
        let removed = members.remove(index);
        self.registry.save_members(&members)?;
        tracing::info!(member = %removed, member_count = members.len(), "Removed member");
        Ok(removed)
    }

    /// Empties the registry and returns how many members were dropped.
    pub fn clear(&self) -> Result<usize, MemberError> {
        let count = self.registry.members()?.len();
        self.registry.save_members(&[])?;
        tracing::info!(member_count = count, "Cleared member registry");
        Ok(count)
    }

    /// Renames a member in the registry and in every entry that names them.
    ///
    /// Returns the number of entries rewritten. Entries are rewritten before the
    /// registry. If the store write fails nothing changes; if the registry write
    /// fails the original entries are written back.
    pub fn rename(&self, from: &str, to: &str) -> Result<usize, MemberError> {
        let to = normalized(to)?;
        let mut members = self.registry.members()?;
        let Some(index) = members.iter().position(|member| member.as_str() == from) else {
            return Err(MemberError::NotAMember(from.into()));
        };
        if to.as_str() == from {
            return Ok(0);
        }
        if members.contains(&to) {
            return Err(MemberError::AlreadyMember(to));
        }

        let original = self.store.list()?;
        let mut entries = original.clone();
        let mut rewritten = 0usize;
        for entry in &mut entries {
            let mut touched = false;
            if entry.payer.as_str() == from {
                entry.payer = to.clone();
                touched = true;
            }
            touched |= entry.beneficiaries.rename(from, &to);
            if touched {
                rewritten += 1;
            }
        }
        if rewritten > 0 {
            self.store.replace_all(entries)?;
        }

        members[index] = to.clone();
        if let Err(err) = self.registry.save_members(&members) {
            if rewritten > 0
                && let Err(rollback) = self.store.replace_all(original)
            {
                tracing::error!(
                    from,
                    to = %to,
                    error = %rollback,
                    "Failed to restore entries after rename"
                );
            }
            return Err(err.into());
        }
        tracing::info!(from, to = %to, entry_count = rewritten, "Renamed member");
        Ok(rewritten)
    }
}

fn normalized(name: &str) -> Result<MemberName, MemberError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(MemberError::BlankName);
    }
    if trimmed.contains(NAME_SEPARATOR) {
        return Err(MemberError::ReservedCharacter(NAME_SEPARATOR));
    }
    Ok(MemberName::from(trimmed))
}

#![no_main]
use arbitrary::Arbitrary;
use festfriend_protocol::{CredentialSecret, GroupId, GroupRegistry, RegistryError};
use libfuzzer_sys::fuzz_target;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::{HashMap, HashSet};

#[derive(Arbitrary, Debug)]
enum Op {
    Reserve,
    Release(u16),
    Create(u16),
    Append(u16, u8),
}

#[derive(Arbitrary, Debug)]
struct Input {
    seed: u64,
    ops: Vec<Op>,
}

// Small name pool so duplicates actually occur
const NAMES: [&str; 6] = ["alice", "bob", "Alice", "john", "", "bob "];

fuzz_target!(|input: Input| {
    let registry = GroupRegistry::new();
    let mut rng = ChaCha8Rng::seed_from_u64(input.seed);
    let mut model: HashMap<GroupId, Vec<String>> = HashMap::new();
    let mut reserved: HashSet<GroupId> = HashSet::new();

    for op in input.ops.into_iter().take(512) {
        match op {
            Op::Reserve => {
                let id = registry.reserve_id(&mut rng).expect("space cannot fill here");
                assert!(!model.contains_key(&id));
                assert!(reserved.insert(id));
            }
            Op::Release(raw) => {
                registry.release_id(GroupId(raw));
                reserved.remove(&GroupId(raw));
            }
            Op::Create(raw) => {
                let id = GroupId(raw);
                let result = registry.create_group(id, CredentialSecret::new("s"));
                if model.contains_key(&id) {
                    assert_eq!(result, Err(RegistryError::AlreadyExists(id)));
                } else {
                    assert!(result.is_ok());
                    model.insert(id, Vec::new());
                    reserved.remove(&id);
                }
            }
            Op::Append(raw, name) => {
                let id = GroupId(raw);
                let name = NAMES[name as usize % NAMES.len()];
                let result = registry.append_member(id, name);
                match model.get_mut(&id) {
                    None => assert_eq!(result, Err(RegistryError::NotFound(id))),
                    Some(members) if members.iter().any(|m| m == name) => {
                        assert_eq!(result, Err(RegistryError::DuplicateMember(name.into())))
                    }
                    Some(members) => {
                        assert!(result.is_ok());
                        members.push(name.to_owned());
                    }
                }
            }
        }
    }

    assert_eq!(registry.len(), model.len());
    for (id, members) in &model {
        assert_eq!(&registry.list_members(*id).unwrap(), members);
    }
});

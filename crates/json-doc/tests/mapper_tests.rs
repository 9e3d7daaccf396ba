use std::collections::{BTreeMap, HashMap, VecDeque};

use indexmap::IndexMap;
use json_doc::mapper::{self, EnumValue, Mappable, Record, RecordDescriptor};
use json_doc::{map_enum, map_record, Value};

#[derive(Debug, Default, Clone, Copy, PartialEq)]
enum Class {
    #[default]
    Warrior,
    Mage,
    Rogue,
}
map_enum!(Class { Warrior, Mage, Rogue });

#[derive(Debug, Default, Clone, PartialEq)]
struct Stats {
    health: i32,
    mana: i32,
}
map_record!(Stats { health, mana });

#[derive(Debug, Default, Clone, PartialEq)]
struct Hero {
    name: String,
    level: u32,
    class: Class,
    stats: Stats,
    inventory: Vec<String>,
    nickname: Option<String>,
}
map_record!(Hero {
    name,
    level,
    class,
    stats,
    inventory,
    nickname,
});

fn hero_value() -> Value {
    Value::parse(
        r#"{"name":"Hero","level":25,"class":"Mage","stats":{"health":100,"mana":50},"inventory":["sword","shield"],"nickname":null}"#,
    )
}

// ============================================================================
// Records
// ============================================================================

#[test]
fn project_full_record() {
    let hero: Hero = mapper::project(&hero_value());
    assert_eq!(
        hero,
        Hero {
            name: "Hero".into(),
            level: 25,
            class: Class::Mage,
            stats: Stats {
                health: 100,
                mana: 50
            },
            inventory: vec!["sword".into(), "shield".into()],
            nickname: None,
        }
    );
}

#[test]
fn capture_follows_descriptor_order() {
    let hero: Hero = mapper::project(&hero_value());
    assert_eq!(
        mapper::capture(&hero).to_json(false),
        r#"{"name":"Hero","level":25,"class":"Mage","stats":{"health":100,"mana":50},"inventory":["sword","shield"],"nickname":null}"#
    );
}

#[test]
fn missing_members_stay_at_zero_value() {
    let hero: Hero = mapper::project(&Value::parse(r#"{"name":"Solo"}"#));
    assert_eq!(hero.name, "Solo");
    assert_eq!(hero.level, 0);
    assert_eq!(hero.class, Class::Warrior);
    assert_eq!(hero.stats, Stats::default());
    assert!(hero.inventory.is_empty());
}

#[test]
fn unknown_source_keys_are_ignored() {
    let hero: Hero = mapper::project(&Value::parse(r#"{"level":3,"guild":"none"}"#));
    assert_eq!(hero.level, 3);
}

#[test]
fn non_object_source_assigns_nothing() {
    let mut hero = Hero {
        level: 9,
        ..Hero::default()
    };
    assert_eq!(mapper::project_into(&Value::array(), &mut hero), 0);
    assert_eq!(hero.level, 9);
}

#[test]
fn project_into_keeps_members_absent_from_source() {
    let mut hero: Hero = mapper::project(&hero_value());
    let assigned = mapper::project_into(&Value::parse(r#"{"level":26}"#), &mut hero);
    assert_eq!(assigned, 1);
    assert_eq!(hero.level, 26);
    assert_eq!(hero.name, "Hero");
}

#[test]
fn nested_record_from_non_object_keeps_previous_value() {
    let mut hero = Hero {
        stats: Stats {
            health: 1,
            mana: 2,
        },
        ..Hero::default()
    };
    mapper::project_into(&Value::parse(r#"{"stats":"broken"}"#), &mut hero);
    assert_eq!(hero.stats, Stats { health: 1, mana: 2 });
}

#[test]
fn one_bad_member_does_not_abort_the_rest() {
    let source = Value::parse(r#"{"name":"X","inventory":"not a list","level":"7"}"#);
    let hero: Hero = mapper::project(&source);
    assert_eq!(hero.name, "X");
    assert_eq!(hero.level, 7);
    assert!(hero.inventory.is_empty());
}

#[derive(Debug, Default, PartialEq)]
struct Renamed {
    health: i32,
}
map_record!(Renamed { health => "hp" });

#[test]
fn renamed_member_uses_its_key() {
    let r: Renamed = mapper::project(&Value::parse(r#"{"hp":12,"health":99}"#));
    assert_eq!(r.health, 12);
    assert_eq!(mapper::capture(&r).to_json(false), r#"{"hp":12}"#);
}

#[derive(Debug, Default, PartialEq)]
struct Summary {
    name: String,
    level: f64,
}
map_record!(Summary { name, level });

#[test]
fn convert_between_record_types_by_member_name() {
    let hero: Hero = mapper::project(&hero_value());
    let summary: Summary = mapper::convert(&hero);
    assert_eq!(
        summary,
        Summary {
            name: "Hero".into(),
            level: 25.0
        }
    );
}

#[test]
fn descriptor_is_built_once() {
    let first: *const RecordDescriptor<Hero> = Hero::descriptor();
    let second: *const RecordDescriptor<Hero> = Hero::descriptor();
    assert_eq!(first, second);
    let names: Vec<&str> = Hero::descriptor().fields().iter().map(|f| f.name()).collect();
    assert_eq!(
        names,
        ["name", "level", "class", "stats", "inventory", "nickname"]
    );
}

#[derive(Debug, Default)]
struct Manual {
    id: u64,
}

impl Record for Manual {
    fn descriptor() -> &'static RecordDescriptor<Self> {
        static DESCRIPTOR: std::sync::OnceLock<RecordDescriptor<Manual>> =
            std::sync::OnceLock::new();
        DESCRIPTOR.get_or_init(|| {
            RecordDescriptor::<Manual>::new().field("ID", |m| &m.id, |m| &mut m.id)
        })
    }
}

#[test]
fn hand_written_descriptor() {
    let m: Manual = mapper::project(&Value::parse(r#"{"ID":"42"}"#));
    assert_eq!(m.id, 42);
}

// ============================================================================
// Primitive coercion
// ============================================================================

#[test]
fn integers_coerce_from_strings_bools_and_floats() {
    assert_eq!(i32::from_value(&Value::string(" 17 ")), Some(17));
    assert_eq!(i32::from_value(&Value::boolean(true)), Some(1));
    assert_eq!(i32::from_value(&Value::number(2.5)), Some(2));
    assert_eq!(i32::from_value(&Value::number(3.5)), Some(4));
    assert_eq!(i32::from_value(&Value::string("8.9")), Some(9));
}

#[test]
fn unconvertible_primitives_become_zero() {
    assert_eq!(i32::from_value(&Value::string("abc")), Some(0));
    assert_eq!(u8::from_value(&Value::number(300.0)), Some(0));
    assert_eq!(u32::from_value(&Value::number(-1.0)), Some(0));
    assert_eq!(f64::from_value(&Value::object()), Some(0.0));
    assert_eq!(bool::from_value(&Value::null()), Some(false));
    assert_eq!(String::from_value(&Value::array()), Some(String::new()));
}

#[test]
fn integer_range_bounds_are_exact() {
    let two_pow_64 = 18_446_744_073_709_551_616.0;
    let two_pow_63 = 9_223_372_036_854_775_808.0;
    assert_eq!(u64::from_value(&Value::number(two_pow_64)), Some(0));
    assert_eq!(usize::from_value(&Value::number(two_pow_64)), Some(0));
    assert_eq!(i64::from_value(&Value::number(two_pow_63)), Some(0));
    assert_eq!(
        u64::from_value(&Value::string("18446744073709551616")),
        Some(0)
    );
    assert_eq!(i64::from_value(&Value::number(-two_pow_63)), Some(i64::MIN));
    assert_eq!(u8::from_value(&Value::number(255.0)), Some(255));
    assert_eq!(u8::from_value(&Value::number(256.0)), Some(0));
    assert_eq!(
        u64::from_value(&Value::string("18446744073709551615")),
        Some(u64::MAX)
    );
}

#[test]
fn strings_coerce_from_scalars() {
    assert_eq!(String::from_value(&Value::number(25.0)), Some("25".into()));
    assert_eq!(String::from_value(&Value::number(0.5)), Some("0.5".into()));
    assert_eq!(String::from_value(&Value::boolean(true)), Some("true".into()));
}

#[test]
fn bools_coerce_case_insensitively() {
    assert_eq!(bool::from_value(&Value::string("TRUE")), Some(true));
    assert_eq!(bool::from_value(&Value::string("false")), Some(false));
    assert_eq!(bool::from_value(&Value::string("1")), Some(true));
    assert_eq!(bool::from_value(&Value::number(0.0)), Some(false));
}

#[test]
fn chars_take_single_character_strings() {
    assert_eq!(char::from_value(&Value::string("x")), Some('x'));
    assert_eq!(char::from_value(&Value::string("xy")), Some('\0'));
    assert_eq!(char::from_value(&Value::number(65.0)), Some('A'));
}

#[test]
fn value_members_are_assigned_directly() {
    let source = Value::object().with("k", Value::array().with_item(1));
    assert_eq!(Value::from_value(&source), Some(source.clone()));
}

// ============================================================================
// Enums
// ============================================================================

#[test]
fn enum_parses_case_insensitively() {
    assert_eq!(Class::from_value(&Value::string("rogue")), Some(Class::Rogue));
    assert_eq!(Class::from_value(&Value::string(" MAGE ")), Some(Class::Mage));
}

#[test]
fn enum_maps_from_ordinal() {
    assert_eq!(Class::from_value(&Value::number(2.0)), Some(Class::Rogue));
    assert_eq!(Class::from_value(&Value::string("1")), Some(Class::Mage));
}

#[test]
fn enum_falls_back_to_first_member() {
    assert_eq!(Class::from_value(&Value::string("bard")), Some(Class::Warrior));
    assert_eq!(Class::from_value(&Value::number(99.0)), Some(Class::Warrior));
    assert_eq!(Class::from_value(&Value::number(-1.0)), Some(Class::Warrior));
    assert_eq!(Class::from_value(&Value::null()), Some(Class::Warrior));
}

#[test]
fn enum_names_and_ordinals() {
    assert_eq!(Class::Mage.name(), "Mage");
    assert_eq!(Class::Rogue.ordinal(), 2);
    assert_eq!(Class::Rogue.to_value(), Value::string("Rogue"));
}

// ============================================================================
// Collections
// ============================================================================

#[test]
fn sequences_convert_element_wise() {
    let source = Value::parse(r#"[1, "2", true, null]"#);
    assert_eq!(Vec::<i32>::from_value(&source), Some(vec![1, 2, 1, 0]));
    assert_eq!(
        VecDeque::<i32>::from_value(&source),
        Some(VecDeque::from(vec![1, 2, 1, 0]))
    );
}

#[test]
fn fixed_size_array_is_sized_to_source() {
    let boxed = Box::<[u8]>::from_value(&Value::parse("[1,2,3]")).unwrap();
    assert_eq!(boxed.len(), 3);
    assert_eq!(&*boxed, &[1, 2, 3]);
}

#[test]
fn sequence_drops_unconvertible_records() {
    let source = Value::parse(r#"[{"health":1}, 5, {"mana":2}]"#);
    let stats = Vec::<Stats>::from_value(&source).unwrap();
    assert_eq!(
        stats,
        vec![
            Stats { health: 1, mana: 0 },
            Stats { health: 0, mana: 2 }
        ]
    );
}

#[test]
fn sequence_from_non_array_is_skipped() {
    assert_eq!(Vec::<i32>::from_value(&Value::string("1,2")), None);
}

#[test]
fn maps_convert_entry_wise() {
    let source = Value::parse(r#"{"b":2,"a":1}"#);
    let hash = HashMap::<String, i32>::from_value(&source).unwrap();
    assert_eq!(hash["a"], 1);
    let btree = BTreeMap::<String, i32>::from_value(&source).unwrap();
    assert_eq!(btree.keys().collect::<Vec<_>>(), ["a", "b"]);
    let ordered = IndexMap::<String, i32>::from_value(&source).unwrap();
    assert_eq!(ordered.keys().collect::<Vec<_>>(), ["b", "a"]);
}

#[test]
fn map_skips_entries_with_unconvertible_keys() {
    let source = Value::parse(r#"{"1":"one","x":"bad","2":"two"}"#);
    let map = BTreeMap::<u32, String>::from_value(&source).unwrap();
    assert_eq!(map.len(), 2);
    assert_eq!(map[&2], "two");
}

#[test]
fn map_capture_uses_key_text() {
    let mut map = IndexMap::new();
    map.insert(10u16, vec![true]);
    map.insert(3u16, vec![]);
    assert_eq!(map.to_value().to_json(false), r#"{"10":[true],"3":[]}"#);
}

#[test]
fn option_members_distinguish_null_from_absent() {
    assert_eq!(Option::<i32>::from_value(&Value::null()), Some(None));
    assert_eq!(Option::<i32>::from_value(&Value::number(4.0)), Some(Some(4)));
    assert_eq!(Option::<Stats>::from_value(&Value::string("x")), None);
}

// ============================================================================
// Path-qualified types
// ============================================================================

mod save {
    #[derive(Debug, Default, Clone, Copy, PartialEq)]
    pub enum Difficulty {
        #[default]
        Easy,
        Hard,
    }

    #[derive(Debug, Default, PartialEq)]
    pub struct Slot {
        pub id: u32,
        pub difficulty: Difficulty,
    }
}

map_enum!(save::Difficulty { Easy, Hard });
map_record!(save::Slot { id, difficulty });

#[test]
fn macros_accept_path_qualified_types() {
    let slot: save::Slot = mapper::project(&Value::parse(r#"{"id":3,"difficulty":"hard"}"#));
    assert_eq!(
        slot,
        save::Slot {
            id: 3,
            difficulty: save::Difficulty::Hard
        }
    );
    assert_eq!(
        mapper::capture(&slot).to_json(false),
        r#"{"id":3,"difficulty":"Hard"}"#
    );
}

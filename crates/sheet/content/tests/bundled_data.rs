use sheet_content::{CharacterLoader, ContentFactory};
use sheet_core::{Entity, Fingerprint, Fxp, ThresholdOp};

fn fx(text: &str) -> Fxp {
    text.parse().unwrap()
}

#[test]
fn bundled_settings_load() {
    let ctx = ContentFactory::bundled().load_context().unwrap();
    let ids: Vec<&str> = ctx.defs().list().iter().map(|d| d.id()).collect();
    assert_eq!(
        ids,
        ["st", "dx", "iq", "ht", "will", "per", "basic_speed", "basic_move", "fp", "hp"]
    );
    assert_eq!(ctx.general.initial_points, Fxp::from_int(150));

    let again = ContentFactory::bundled().load_sheet().unwrap();
    assert_eq!(ctx.sheet.fingerprint(), again.fingerprint());
}

#[test]
fn derived_values_follow_definitions() {
    let ctx = ContentFactory::bundled().load_context().unwrap();
    let mut entity = Entity::new(&ctx);
    assert!(entity.set_attribute_maximum("dx", Fxp::from_int(13)));
    assert!(entity.set_attribute_maximum("iq", Fxp::from_int(12)));

    let view = entity.attributes();
    assert_eq!(view.current("basic_speed"), fx("5.75"));
    assert_eq!(view.current("basic_move"), Fxp::from_int(5));
    assert_eq!(view.current("will"), Fxp::from_int(12));
    assert_eq!(entity.spent_points(), Fxp::from_int(100));
    assert_eq!(entity.unspent_points(), Fxp::from_int(50));
}

#[test]
fn hit_point_states() {
    let ctx = ContentFactory::bundled().load_context().unwrap();
    let mut entity = Entity::new(&ctx);
    let state = |entity: &Entity| {
        entity
            .attributes()
            .current_threshold("hp")
            .map(|t| t.state.clone())
    };

    assert_eq!(state(&entity).as_deref(), Some("Healthy"));
    entity.set_attribute_current("hp", Fxp::from_int(6));
    assert_eq!(state(&entity).as_deref(), Some("Wounded"));
    entity.set_attribute_current("hp", Fxp::from_int(2));
    assert_eq!(state(&entity).as_deref(), Some("Reeling"));
    let reeling = entity.attributes().current_threshold("hp").unwrap();
    assert!(reeling.contains_op(ThresholdOp::HalveMove));
    assert!(!reeling.contains_op(ThresholdOp::HalveSt));
    entity.set_attribute_current("hp", Fxp::ZERO);
    assert_eq!(state(&entity).as_deref(), Some("Collapse"));
    entity.set_attribute_current("hp", Fxp::from_int(-40));
    assert_eq!(state(&entity).as_deref(), Some("Dying #4"));

    assert_eq!(entity.attributes().pool_threshold("hp", "reeling"), Fxp::from_int(3));
    assert!(entity.attributes().pool_threshold("hp", "asleep").is_unresolved());
}

#[test]
fn character_file_round_trip() {
    let ctx = ContentFactory::bundled().load_context().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hero.json");
    std::fs::write(
        &path,
        r#"{
            "version": 1,
            "profile": {"name": "Hero", "tech_level": "8", "SM": 1},
            "total_points": 200,
            "attributes": [
                {"attr_id": "st", "adjustment": 2},
                {"attr_id": "hp", "adjustment": 5, "damage": 3},
                {"attr_id": "retired_attribute", "adjustment": 9}
            ],
            "traits": [
                {"id": 1, "name": "Combat Reflexes", "points": 15,
                 "prereqs": {"type": "prereq_list", "all": true, "prereqs": [
                    {"type": "attribute_prereq", "has": true, "which": "dx",
                     "qualifier": {"compare": "at_least", "qualifier": 12}}
                 ]}}
            ]
        }"#,
    )
    .unwrap();

    let entity = CharacterLoader::load(&ctx, &path).unwrap();
    let view = entity.attributes();
    assert!(view.attributes().get("retired_attribute").is_none());
    assert_eq!(view.attributes().len(), ctx.defs().len());
    // synthesized attributes follow the stored ones
    assert_eq!(view.attributes().list()[0].id(), "st");
    assert_eq!(view.attributes().list()[1].id(), "hp");
    assert_eq!(view.current("hp"), Fxp::from_int(14));
    // ST +2 at SM +1: 20 less 10%; HP +5 at SM +1: 10 less 10%
    assert_eq!(view.point_cost("st"), Fxp::from_int(18));
    assert_eq!(view.point_cost("hp"), Fxp::from_int(9));

    let missing = entity.unsatisfied_traits().unwrap();
    assert_eq!(missing.len(), 1);
    assert!(missing[0].explanation.contains("Has DX which is at least 12"));

    CharacterLoader::save(&entity, &path).unwrap();
    let reloaded = CharacterLoader::load(&ctx, &path).unwrap();
    assert_eq!(reloaded.to_record(), entity.to_record());
    assert_eq!(
        reloaded.attributes().attributes().fingerprint(),
        entity.attributes().attributes().fingerprint()
    );
}

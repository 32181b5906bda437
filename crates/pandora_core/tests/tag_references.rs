use pandora_core::{
    BaseTag, Block, Entity, EntityWithSources, File, LinkType, NamedEntity, PandoraError,
};

fn block(file: &File) -> Block {
    file.blocks().create("session", "recording").unwrap()
}

#[test]
fn valid_units_are_stored_sanitized() {
    let file = File::in_memory().unwrap();
    let tag = block(&file).tags().create("stimulus", "event").unwrap();

    tag.set_units(&["mV", " s", "mu A"]).unwrap();
    assert_eq!(tag.units().unwrap(), vec!["mV", "s", "uA"]);

    assert!(tag.remove_units().unwrap());
    assert!(tag.units().unwrap().is_empty());
}

#[test]
fn one_invalid_unit_rejects_the_whole_list() {
    let file = File::in_memory().unwrap();
    let tag = block(&file).tags().create("stimulus", "event").unwrap();
    tag.set_units(&["s"]).unwrap();

    let err = tag.set_units(&["mV", "none", "bogusUnit"]).unwrap_err();
    assert!(matches!(err, PandoraError::InvalidUnit { ref unit, .. } if unit == "bogusUnit"));
    assert!(err.to_string().contains("bogusUnit"));
    assert_eq!(tag.units().unwrap(), vec!["s"]);
}

#[test]
fn references_round_trip_through_the_block() {
    let file = File::in_memory().unwrap();
    let block = block(&file);
    let array = block.data_arrays().create("voltage", "signal").unwrap();
    let tag = block.tags().create("stimulus", "event").unwrap();

    tag.add_reference(&array).unwrap();
    assert!(tag.has_reference(&array).unwrap());
    assert_eq!(tag.reference_count().unwrap(), 1);
    assert_eq!(tag.get_reference(0).unwrap(), array);
    assert_eq!(tag.get_reference_by_id(array.id()).unwrap(), array);
    assert_eq!(tag.references().unwrap(), vec![array.clone()]);

    tag.add_reference(&array).unwrap();
    assert_eq!(tag.reference_count().unwrap(), 1);

    assert!(tag.remove_reference(&array).unwrap());
    assert!(!tag.has_reference(&array).unwrap());
    assert!(!tag.remove_reference(&array).unwrap());
}

#[test]
fn references_outside_the_block_are_rejected() {
    let file = File::in_memory().unwrap();
    let first = block(&file);
    let second = block(&file);
    let foreign = second.data_arrays().create("voltage", "signal").unwrap();
    let tag = first.tags().create("stimulus", "event").unwrap();

    let err = tag.add_reference(&foreign).unwrap_err();
    assert!(matches!(err, PandoraError::NotFound { kind: "data array", .. }));
    assert_eq!(tag.reference_count().unwrap(), 0);

    assert!(matches!(
        tag.add_reference_id("  ").unwrap_err(),
        PandoraError::InvalidInput(_)
    ));
    assert!(matches!(
        tag.get_reference(0).unwrap_err(),
        PandoraError::OutOfBounds { index: 0, count: 0, .. }
    ));
}

#[test]
fn removed_targets_surface_as_not_found() {
    let file = File::in_memory().unwrap();
    let block = block(&file);
    let array = block.data_arrays().create("voltage", "signal").unwrap();
    let tag = block.tags().create("stimulus", "event").unwrap();
    tag.add_reference(&array).unwrap();

    block.data_arrays().remove(array.id()).unwrap();
    assert!(tag.get_reference(0).unwrap_err().is_not_found());
}

#[test]
fn source_references_reach_nested_sources() {
    let file = File::in_memory().unwrap();
    let block = block(&file);
    let tetrode = block.sources().create("tetrode", "electrode").unwrap();
    let channel = tetrode.sources().create("channel", "electrode").unwrap();
    let tag = block.tags().create("stimulus", "event").unwrap();

    tag.add_source(&channel).unwrap();
    assert!(tag.has_source(&channel).unwrap());
    assert_eq!(tag.source_count().unwrap(), 1);
    assert_eq!(tag.get_source(0).unwrap(), channel);
    assert_eq!(tag.sources().unwrap(), vec![channel.clone()]);

    assert!(tag.add_source_id("source_missing").unwrap_err().is_not_found());
    assert!(tag.remove_source(&channel).unwrap());
    assert_eq!(tag.source_count().unwrap(), 0);
}

#[test]
fn data_arrays_reference_sources_too() {
    let file = File::in_memory().unwrap();
    let block = block(&file);
    let tetrode = block.sources().create("tetrode", "electrode").unwrap();
    let array = block.data_arrays().create("voltage", "signal").unwrap();

    array.add_source(&tetrode).unwrap();
    assert_eq!(array.get_source(0).unwrap(), tetrode);
}

#[test]
fn features_link_block_data_with_a_link_type() {
    let file = File::in_memory().unwrap();
    let block = block(&file);
    let array = block.data_arrays().create("spikes", "event").unwrap();
    let other = block.data_arrays().create("lfp", "signal").unwrap();
    let tag = block.tags().create("stimulus", "event").unwrap();

    let feature = tag.create_feature(&array, LinkType::Indexed).unwrap();
    assert!(feature.id().starts_with("feature_"));
    assert!(tag.has_feature(feature.id()).unwrap());
    assert_eq!(tag.feature_count().unwrap(), 1);

    let loaded = tag.get_feature(feature.id()).unwrap();
    assert_eq!(loaded.link_type().unwrap(), LinkType::Indexed);
    assert_eq!(loaded.data().unwrap(), array);
    assert_eq!(tag.feature_at(0).unwrap(), loaded);

    loaded.set_link_type(LinkType::Tagged).unwrap();
    loaded.set_data(&other).unwrap();
    assert_eq!(tag.features().unwrap()[0].data_id().unwrap(), other.id());

    assert!(tag.delete_feature(feature.id()).unwrap());
    assert!(!tag.delete_feature(feature.id()).unwrap());
    assert_eq!(tag.feature_count().unwrap(), 0);
}

#[test]
fn tag_position_and_extent_are_float_lists() {
    let file = File::in_memory().unwrap();
    let tag = block(&file).tags().create("stimulus", "event").unwrap();

    assert!(tag.position().unwrap().is_empty());
    tag.set_position(&[1.5, 2.0]).unwrap();
    tag.set_extent(&[0.5, 0.5]).unwrap();
    assert_eq!(tag.position().unwrap(), vec![1.5, 2.0]);
    assert_eq!(tag.extent().unwrap(), vec![0.5, 0.5]);

    assert!(tag.remove_extent().unwrap());
    assert!(tag.extent().unwrap().is_empty());
}

#[test]
fn multi_tags_share_the_tag_behaviour() {
    let file = File::in_memory().unwrap();
    let block = block(&file);
    let positions = block.data_arrays().create("onsets", "positions").unwrap();
    let extents = block.data_arrays().create("durations", "extents").unwrap();
    let multi_tag = block.multi_tags().create("stimuli", "event").unwrap();

    assert!(multi_tag.id().starts_with("multi_tag_"));
    assert_eq!(multi_tag.positions().unwrap(), None);

    multi_tag.set_positions(&positions).unwrap();
    multi_tag.set_extents(&extents).unwrap();
    assert_eq!(multi_tag.positions().unwrap(), Some(positions.clone()));
    assert_eq!(multi_tag.extents().unwrap(), Some(extents));
    assert!(multi_tag.remove_extents().unwrap());
    assert_eq!(multi_tag.extents().unwrap(), None);

    multi_tag.set_units(&["s"]).unwrap();
    multi_tag.add_reference(&positions).unwrap();
    assert_eq!(multi_tag.units().unwrap(), vec!["s"]);
    assert_eq!(multi_tag.get_reference(0).unwrap(), positions);
}

#[test]
fn non_finite_positions_are_rejected_and_keep_the_stored_value() {
    let file = File::in_memory().unwrap();
    let tag = block(&file).tags().create("stimulus", "event").unwrap();
    tag.set_position(&[1.0, 2.0]).unwrap();

    let err = tag.set_position(&[f64::NAN, 1.0]).unwrap_err();
    assert!(matches!(err, PandoraError::InvalidInput(_)));
    assert!(matches!(
        tag.set_extent(&[f64::INFINITY]).unwrap_err(),
        PandoraError::InvalidInput(_)
    ));

    assert_eq!(tag.position().unwrap(), vec![1.0, 2.0]);
    assert!(tag.extent().unwrap().is_empty());
}

#[test]
fn references_and_features_can_be_filtered() {
    let file = File::in_memory().unwrap();
    let block = block(&file);
    let voltage = block.data_arrays().create("voltage", "signal").unwrap();
    let spikes = block.data_arrays().create("spikes", "event").unwrap();
    let tag = block.tags().create("stimulus", "event").unwrap();
    tag.add_reference(&voltage).unwrap();
    tag.add_reference(&spikes).unwrap();
    tag.create_feature(&voltage, LinkType::Tagged).unwrap();
    let indexed = tag.create_feature(&spikes, LinkType::Indexed).unwrap();

    let signals = tag
        .references_filtered(|array| array.entity_type().is_ok_and(|kind| kind == "signal"))
        .unwrap();
    assert_eq!(signals, vec![voltage]);
    assert!(tag.references_filtered(|_| false).unwrap().is_empty());

    let indexed_only = tag
        .features_filtered(|feature| feature.link_type().ok() == Some(LinkType::Indexed))
        .unwrap();
    assert_eq!(indexed_only, vec![indexed]);
    assert_eq!(tag.features_filtered(|_| true).unwrap().len(), 2);
}

#[test]
fn removals_refresh_updated_at() {
    let file = File::in_memory().unwrap();
    let block = block(&file);
    let tetrode = block.sources().create("tetrode", "electrode").unwrap();
    let array = block.data_arrays().create("voltage", "signal").unwrap();
    let tag = block.tags().create("stimulus", "event").unwrap();
    tag.set_units(&["mV"]).unwrap();
    tag.set_extent(&[1.0]).unwrap();
    tag.add_reference(&array).unwrap();
    tag.add_source(&tetrode).unwrap();
    let feature = tag.create_feature(&array, LinkType::Untagged).unwrap();

    let reset = || tag.node().group().set_attr("updated_at", 0_i64).unwrap();
    let refreshed = || tag.updated_at().unwrap().unwrap() > 0;

    reset();
    assert!(tag.remove_units().unwrap());
    assert!(refreshed());

    reset();
    assert!(tag.remove_extent().unwrap());
    assert!(refreshed());

    reset();
    assert!(tag.remove_reference(&array).unwrap());
    assert!(refreshed());

    reset();
    assert!(tag.remove_source(&tetrode).unwrap());
    assert!(refreshed());

    reset();
    assert!(tag.delete_feature(feature.id()).unwrap());
    assert!(refreshed());

    reset();
    assert!(!tag.remove_units().unwrap());
    assert_eq!(tag.updated_at().unwrap(), Some(0));
}

#[test]
fn tags_and_features_display_their_identity() {
    let file = File::in_memory().unwrap();
    let block = block(&file);
    let array = block.data_arrays().create("voltage", "signal").unwrap();
    let tag = block.tags().create("stimulus", "event").unwrap();
    let feature = tag.create_feature(&array, LinkType::Tagged).unwrap();

    assert_eq!(
        tag.to_string(),
        format!("Tag: {{name = stimulus, type = event, id = {}}}", tag.id())
    );
    assert_eq!(
        feature.to_string(),
        format!(
            "Feature: {{link_type = tagged, data = {}, id = {}}}",
            array.id(),
            feature.id()
        )
    );
}

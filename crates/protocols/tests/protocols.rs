//! Integration tests for the protocol families, driven by fixture trees
//! that mirror the corpus data layout.

use odessa_annot::Segment;
use odessa_protocols::{
    DiarizationVariant, ProtocolError, SpeakerDerivation, SpeakerDiarization, SpeakerSpotting,
    SpeakerVerification, Subset,
};
use odessa_table::TableError;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tempfile::{tempdir, TempDir};

fn write_file(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

// ===== Speaker diarization =====

fn diarization_fixture() -> TempDir {
    let dir = tempdir().unwrap();
    // REC02 listed first on purpose: iteration order must come from
    // sorting, not from the file.
    write_file(
        dir.path(),
        "p1.dev.uem",
        "REC02 1 0.0 240.0\n\
         REC02 1 250.0 280.0\n\
         REC01 1 0.0 300.0\n",
    );
    write_file(
        dir.path(),
        "p1.dev.mdtm",
        "REC01 1 5.0 10.0 speaker NA male ALICE\n\
         REC01 1 20.0 5.5 speaker NA female BOB\n\
         REC02 1 0.5 12.0 speaker NA male CAROL\n\
         REC02 1 30.0 0.0 speaker NA male CAROL\n",
    );
    dir
}

#[test]
fn diarization_yields_one_item_per_uri_in_sorted_order() {
    let dir = diarization_fixture();
    let protocol = SpeakerDiarization::new(dir.path(), DiarizationVariant::P1);
    let items: Vec<_> = protocol.subset(Subset::Dev).unwrap().collect();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].uri, "REC01");
    assert_eq!(items[1].uri, "REC02");
    assert!(items.iter().all(|item| item.database == "AMI"));
    assert!(items.iter().all(|item| item.crop.is_none()));
}

#[test]
fn diarization_builds_annotated_regions_and_turns() {
    let dir = diarization_fixture();
    let protocol = SpeakerDiarization::new(dir.path(), DiarizationVariant::P1);
    let items: Vec<_> = protocol.dev().unwrap().collect();

    let rec01 = &items[0];
    assert_eq!(rec01.annotated.segments(), &[Segment::new(0.0, 300.0)]);
    assert_eq!(rec01.annotation.len(), 2);
    assert_eq!(rec01.annotation.turns()[0].segment, Segment::new(5.0, 15.0));
    assert_eq!(rec01.annotation.turns()[0].label, "ALICE");
    assert_eq!(rec01.annotation.turns()[1].segment, Segment::new(20.0, 25.5));
    assert_eq!(rec01.annotation.labels(), vec!["ALICE", "BOB"]);

    let rec02 = &items[1];
    assert_eq!(
        rec02.annotated.segments(),
        &[Segment::new(0.0, 240.0), Segment::new(250.0, 280.0)]
    );
    // The zero-duration CAROL turn is dropped.
    assert_eq!(rec02.annotation.len(), 1);
    assert_eq!(rec02.annotation.turns()[0].segment, Segment::new(0.5, 12.5));
}

#[test]
fn diarization_turns_lie_within_annotated_regions() {
    let dir = diarization_fixture();
    let protocol = SpeakerDiarization::new(dir.path(), DiarizationVariant::P1);
    for item in protocol.dev().unwrap() {
        for turn in item.annotation.iter() {
            let contained = item
                .annotated
                .iter()
                .any(|region| region.intersection(&turn.segment) == Some(turn.segment));
            assert!(contained, "{}: turn {:?} outside annotated regions", item.uri, turn.segment);
        }
    }
}

#[test]
fn diarization_skips_uris_without_turns() {
    let dir = diarization_fixture();
    write_file(
        dir.path(),
        "p1.dev.uem",
        "REC01 1 0.0 300.0\n\
         REC02 1 0.0 240.0\n\
         REC03 1 0.0 120.0\n",
    );
    let protocol = SpeakerDiarization::new(dir.path(), DiarizationVariant::P1);
    let uris: Vec<String> = protocol.dev().unwrap().map(|item| item.uri).collect();
    assert_eq!(uris, vec!["REC01", "REC02"]);
}

#[test]
fn diarization_re_reads_files_on_each_call() {
    let dir = diarization_fixture();
    let protocol = SpeakerDiarization::new(dir.path(), DiarizationVariant::P1);
    let before: Vec<_> = protocol.dev().unwrap().collect();
    assert_eq!(before[0].annotation.labels(), vec!["ALICE", "BOB"]);

    write_file(
        dir.path(),
        "p1.dev.mdtm",
        "REC01 1 5.0 10.0 speaker NA male DAVE\n\
         REC02 1 0.5 12.0 speaker NA male CAROL\n",
    );
    let after: Vec<_> = protocol.dev().unwrap().collect();
    assert_eq!(after[0].annotation.labels(), vec!["DAVE"]);
}

#[test]
fn diarization_variant_picks_different_files() {
    let dir = diarization_fixture();
    let protocol = SpeakerDiarization::new(dir.path(), DiarizationVariant::P2);
    assert!(matches!(
        protocol.subset(Subset::Dev),
        Err(ProtocolError::Table(TableError::ReadFile { .. }))
    ));
}

#[test]
fn diarization_malformed_rows_are_fatal() {
    let dir = diarization_fixture();
    write_file(dir.path(), "p1.dev.mdtm", "REC01 1 5.0 10.0 speaker NA male\n");
    let protocol = SpeakerDiarization::new(dir.path(), DiarizationVariant::P1);
    assert!(matches!(
        protocol.dev(),
        Err(ProtocolError::Table(TableError::FieldCount { found: 7, .. }))
    ));

    write_file(
        dir.path(),
        "p1.dev.mdtm",
        "REC01 1 five 10.0 speaker NA male ALICE\n",
    );
    assert!(matches!(
        protocol.dev(),
        Err(ProtocolError::Table(TableError::InvalidNumber { .. }))
    ));
}

// ===== Speaker spotting =====

fn spotting_fixture() -> TempDir {
    let dir = tempdir().unwrap();
    write_file(
        dir.path(),
        "llss/AMI.split_references/AMI.p1mh.splitSessionsMapping.dev.lst",
        "ES2003a.1 ES2003a 100.0 160.0\n\
         ES2003a.2 ES2003a 160.0 220.0\n",
    );
    write_file(
        dir.path(),
        "llss/AMI.split_references/AMI.p1mh.splitSessionsWithOffset.dev.rttm",
        "SPEAKER ES2003a.1 1 120.0 5.0 <NA> <NA> FEE016 <NA> <NA>\n\
         SPEAKER ES2003a.1 1 130.0 4.0 <NA> <NA> MEE017 <NA> <NA>\n\
         SPEAKER ES2003a.2 1 170.0 6.0 <NA> <NA> FEE016 <NA> <NA>\n\
         SPEAKER ES2003a.2 1 180.0 -2.0 <NA> <NA> FEE016 <NA> <NA>\n",
    );
    write_file(
        dir.path(),
        "llss/AMI.p1mh/dev/AMI.p1mh.enrollment_60sec.enrollment.dev.rttm",
        "SPEAKER ES2003a.1 1 110.0 30.0 <NA> <NA> FEE016_m1 <NA> <NA>\n\
         SPEAKER ES2003a.1 1 145.0 0.0 <NA> <NA> FEE016_m1 <NA> <NA>\n\
         SPEAKER ES2003a.2 1 165.0 20.0 <NA> <NA> MEE017_m1 <NA> <NA>\n",
    );
    write_file(
        dir.path(),
        "llss/AMI.p1mh/dev/AMI.p1mh.enrollment_60sec.speakerModels.dev.lst",
        "FEE016_m1 ES2003a.1\n\
         MEE017_m1 ES2003a.2\n\
         GHOST_m1 ES2003a.9\n\
         PHANTOM_m1 ES2003a.1\n",
    );
    write_file(
        dir.path(),
        "llss/AMI.p1mh/dev/AMI.p1mh.enrollment_60sec.LLSS.dev.trl",
        "FEE016_m1 ES2003a.1 100.0 LLSS1\n\
         FEE016_m1 ES2003a.2 160.0 LLSS2\n\
         MEE017_m1 ES2003a.2 160.0 LLSS3\n\
         MEE017_m1 ES2003a.9 0.0 LLSS4\n",
    );
    dir
}

#[test]
fn spotting_items_follow_session_file_order() {
    let dir = spotting_fixture();
    let protocol = SpeakerSpotting::new(dir.path());
    let items: Vec<_> = protocol.dev().unwrap().collect();
    assert_eq!(items.len(), 2);
    assert!(items.iter().all(|item| item.uri == "ES2003a.Mix-Headset"));
    let session_ids: Vec<&str> = items
        .iter()
        .map(|item| item.crop.as_ref().unwrap().uri.as_str())
        .collect();
    assert_eq!(session_ids, vec!["ES2003a.1", "ES2003a.2"]);
}

#[test]
fn spotting_item_carries_offset_zeroed_crop() {
    let dir = spotting_fixture();
    let protocol = SpeakerSpotting::new(dir.path());
    let item = protocol.dev().unwrap().next().unwrap();

    assert_eq!(item.annotated.segments(), &[Segment::new(100.0, 160.0)]);
    assert_eq!(item.annotation.turns()[0].segment, Segment::new(120.0, 125.0));
    assert_eq!(item.annotation.turns()[0].label, "FEE016");

    let crop = item.crop.as_ref().unwrap();
    assert_eq!(crop.uri, "ES2003a.1");
    assert_eq!(crop.annotated.segments(), &[Segment::new(0.0, 60.0)]);
    assert_eq!(crop.annotation.turns()[0].segment, Segment::new(20.0, 25.0));
    assert_eq!(crop.annotation.turns()[0].label, "FEE016");
    assert_eq!(
        crop.annotation.turns()[0].track,
        item.annotation.turns()[0].track
    );
    assert!(crop.crop.is_none());
}

#[test]
fn spotting_drops_negative_duration_turns() {
    let dir = spotting_fixture();
    let protocol = SpeakerSpotting::new(dir.path());
    let items: Vec<_> = protocol.dev().unwrap().collect();
    let second = &items[1];
    assert_eq!(second.annotation.len(), 1);
    assert_eq!(second.annotation.turns()[0].segment, Segment::new(170.0, 176.0));
}

#[test]
fn spotting_skips_sessions_without_reference_turns() {
    let dir = spotting_fixture();
    write_file(
        dir.path(),
        "llss/AMI.split_references/AMI.p1mh.splitSessionsMapping.dev.lst",
        "ES2003a.1 ES2003a 100.0 160.0\n\
         ES2003a.9 ES2003a 220.0 280.0\n",
    );
    let protocol = SpeakerSpotting::new(dir.path());
    let items: Vec<_> = protocol.dev().unwrap().collect();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].crop.as_ref().unwrap().uri, "ES2003a.1");
}

#[test]
fn spotting_enrolments_build_session_relative_twins() {
    let dir = spotting_fixture();
    let protocol = SpeakerSpotting::new(dir.path());
    let items: Vec<_> = protocol.dev_enrolments().unwrap().collect();

    // GHOST_m1 has an unknown session, PHANTOM_m1 has no turns.
    assert_eq!(items.len(), 2);

    let first = &items[0];
    assert_eq!(first.model_id, "FEE016_m1");
    assert_eq!(first.uri, "ES2003a.Mix-Headset");
    // The zero-duration enrolment row is dropped.
    assert_eq!(first.enrol_with.segments(), &[Segment::new(110.0, 140.0)]);
    let crop = first.crop.as_ref().unwrap();
    assert_eq!(crop.uri, "ES2003a.1");
    assert_eq!(crop.enrol_with.segments(), &[Segment::new(10.0, 40.0)]);

    assert_eq!(items[1].model_id, "MEE017_m1");
}

#[test]
fn spotting_trials_cover_whole_sessions() {
    let dir = spotting_fixture();
    let protocol = SpeakerSpotting::new(dir.path());
    let trials: Vec<_> = protocol.dev_trials().unwrap().collect();

    // The trial naming session ES2003a.9 is skipped.
    assert_eq!(trials.len(), 3);

    let first = &trials[0];
    assert_eq!(first.model_id, "FEE016_m1");
    assert_eq!(first.uri, "ES2003a.Mix-Headset");
    assert_eq!(first.try_with, Segment::new(100.0, 160.0));
    assert_eq!(first.reference.segments(), &[Segment::new(120.0, 125.0)]);
    let crop = first.crop.as_ref().unwrap();
    assert_eq!(crop.uri, "ES2003a.1");
    assert_eq!(crop.try_with, Segment::new(0.0, 60.0));
    assert_eq!(crop.reference.segments(), &[Segment::new(20.0, 25.0)]);

    let second = &trials[1];
    assert_eq!(second.try_with, Segment::new(160.0, 220.0));
    assert_eq!(second.reference.segments(), &[Segment::new(170.0, 176.0)]);
}

#[test]
fn spotting_trial_for_absent_speaker_keeps_empty_reference() {
    let dir = spotting_fixture();
    let protocol = SpeakerSpotting::new(dir.path());
    let trials: Vec<_> = protocol.dev_trials().unwrap().collect();

    // MEE017 never talks in session ES2003a.2: an impostor trial, not a
    // data problem.
    let third = &trials[2];
    assert_eq!(third.model_id, "MEE017_m1");
    assert!(third.reference.is_empty());
    assert!(third.crop.as_ref().unwrap().reference.is_empty());
    assert_eq!(third.try_with, Segment::new(160.0, 220.0));
}

#[test]
fn spotting_trials_honour_lookup_derivation() {
    let dir = spotting_fixture();
    let mut table = HashMap::new();
    table.insert("FEE016_m1".to_string(), "FEE016".to_string());
    let protocol = SpeakerSpotting::with_derivation(dir.path(), SpeakerDerivation::Lookup(table));
    let trials: Vec<_> = protocol.dev_trials().unwrap().collect();

    // MEE017_m1 has no mapping and is skipped.
    assert_eq!(trials.len(), 2);
    assert!(trials.iter().all(|trial| trial.model_id == "FEE016_m1"));
}

// ===== Speaker verification =====

fn verification_fixture() -> TempDir {
    let dir = tempdir().unwrap();
    write_file(
        dir.path(),
        "verification/AMI.verification.reference.dev.rttm",
        "SPEAKER REC01 1 15.0 5.0 <NA> <NA> SPKR1 <NA> <NA>\n\
         SPEAKER REC01 1 40.0 10.0 <NA> <NA> SPKR2 <NA> <NA>\n\
         SPEAKER REC01 1 65.0 20.0 <NA> <NA> SPKR1 <NA> <NA>\n",
    );
    write_file(
        dir.path(),
        "verification/AMI.verification.enrolment.dev.lst",
        "REC01 100.0 30.0 SPKR1_m1\n\
         REC01 140.0 0.0 SPKR1_m1\n\
         REC01 200.0 25.0 SPKR2_m1\n",
    );
    write_file(
        dir.path(),
        "verification/AMI.verification.trials.dev.lst",
        "SPKR1_m1 REC01 10.0 70.0 target 1 3\n\
         SPKR1_m1 REC01 10.0 70.0 nontarget 1 3\n\
         SPKR9_m1 REC01 0.0 50.0 target 0 0\n",
    );
    dir
}

#[test]
fn verification_enrolments_follow_first_appearance_order() {
    let dir = verification_fixture();
    let protocol = SpeakerVerification::new(dir.path());
    let items: Vec<_> = protocol.dev_enrolments().unwrap().collect();

    assert_eq!(items.len(), 2);
    assert_eq!(items[0].model_id, "SPKR1_m1");
    assert_eq!(items[0].uri, "REC01");
    assert_eq!(items[0].enrol_with.segments(), &[Segment::new(100.0, 130.0)]);
    assert!(items[0].crop.is_none());
    assert_eq!(items[1].model_id, "SPKR2_m1");
    assert_eq!(items[1].enrol_with.segments(), &[Segment::new(200.0, 225.0)]);
}

#[test]
fn verification_target_trial_crops_reference_to_test_interval() {
    let dir = verification_fixture();
    let protocol = SpeakerVerification::new(dir.path());
    let trial = protocol.dev_trials().unwrap().next().unwrap();

    assert_eq!(trial.model_id, "SPKR1_m1");
    assert_eq!(trial.try_with, Segment::new(10.0, 70.0));
    // SPKR2's turn is not part of the reference; SPKR1's second turn is
    // clipped at the end of the test interval.
    assert_eq!(
        trial.reference.segments(),
        &[Segment::new(15.0, 20.0), Segment::new(65.0, 70.0)]
    );
    assert!(trial.crop.is_none());
}

#[test]
fn verification_reference_keeps_fully_contained_turns_exact() {
    let dir = tempdir().unwrap();
    write_file(
        dir.path(),
        "verification/AMI.verification.reference.dev.rttm",
        "SPEAKER REC01 1 15.0 5.0 <NA> <NA> SPKR1 <NA> <NA>\n",
    );
    write_file(
        dir.path(),
        "verification/AMI.verification.trials.dev.lst",
        "SPKR1_m1 REC01 10.0 70.0 target 1 1\n",
    );
    let protocol = SpeakerVerification::new(dir.path());
    let trial = protocol.dev_trials().unwrap().next().unwrap();
    assert_eq!(trial.try_with, Segment::new(10.0, 70.0));
    assert_eq!(trial.reference.segments(), &[Segment::new(15.0, 20.0)]);
}

#[test]
fn verification_nontarget_trial_has_empty_reference() {
    let dir = verification_fixture();
    let protocol = SpeakerVerification::new(dir.path());
    let trials: Vec<_> = protocol.dev_trials().unwrap().collect();

    let nontarget = &trials[1];
    assert_eq!(nontarget.model_id, "SPKR1_m1");
    assert_eq!(nontarget.try_with, Segment::new(10.0, 70.0));
    assert!(nontarget.reference.is_empty());
}

#[test]
fn verification_target_trial_without_turns_is_skipped() {
    let dir = verification_fixture();
    let protocol = SpeakerVerification::new(dir.path());
    let trials: Vec<_> = protocol.dev_trials().unwrap().collect();
    // SPKR9 has no turns on REC01 and the trial claims target.
    assert_eq!(trials.len(), 2);
}

#[test]
fn verification_invalid_target_flag_is_fatal() {
    let dir = verification_fixture();
    write_file(
        dir.path(),
        "verification/AMI.verification.trials.dev.lst",
        "SPKR1_m1 REC01 10.0 70.0 impostor 1 3\n",
    );
    let protocol = SpeakerVerification::new(dir.path());
    assert!(matches!(
        protocol.dev_trials(),
        Err(ProtocolError::InvalidTargetFlag { value, .. }) if value == "impostor"
    ));
}

// File: tests/p6xml_parser.rs
use p6health::error::Error;
use p6health::p6xml::parse_p6xml;
use p6health::scalar::Scalar;

const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<APIBusinessObjects>
  <Calendar>
    <ObjectId>7</ObjectId>
    <Name>Standard 8h</Name>
    <HoursPerDay>8</HoursPerDay>
  </Calendar>
  <Resource>
    <ObjectId>21</ObjectId>
    <Id>ENG</Id>
    <Name>Engineer</Name>
    <ResourceRole>
      <RoleObjectId>4</RoleObjectId>
    </ResourceRole>
  </Resource>
  <Currency>
    <ObjectId>1</ObjectId>
    <Id>USD</Id>
    <Name>US Dollar</Name>
    <Symbol>$</Symbol>
  </Currency>
  <Project>
    <ObjectId>395</ObjectId>
    <Id>DEMO</Id>
    <DataDate>2024-01-10T00:00:00</DataDate>
    <Calendar>
      <ObjectId>7</ObjectId>
      <Name>Standard 8h</Name>
      <HoursPerDay>8</HoursPerDay>
    </Calendar>
    <WBS>
      <ObjectId>50</ObjectId>
      <Code>1</Code>
      <Name>Root</Name>
    </WBS>
    <Activity>
      <ObjectId>1001</ObjectId>
      <Id>A1000</Id>
      <Name>Mobilize</Name>
      <Type>Task Dependent</Type>
      <Status>Not Started</Status>
      <CalendarObjectId>7</CalendarObjectId>
      <EarlyStartDate>2024-01-11T08:00:00</EarlyStartDate>
      <EarlyFinishDate>2024-01-15T17:00:00</EarlyFinishDate>
      <TotalFloat>0</TotalFloat>
    </Activity>
    <Activity>
      <ObjectId>1002</ObjectId>
      <Id>A1010</Id>
      <Name>Excavate</Name>
      <Type>Task Dependent</Type>
      <Status>Not Started</Status>
      <PredecessorLink>
        <PredecessorActivityObjectId>1001</PredecessorActivityObjectId>
        <Type>Finish to Start</Type>
        <Lag>16</Lag>
      </PredecessorLink>
    </Activity>
    <ResourceAssignment>
      <ObjectId>9001</ObjectId>
      <ActivityObjectId>1001</ActivityObjectId>
      <ResourceObjectId>21</ResourceObjectId>
      <PlannedUnits>40</PlannedUnits>
    </ResourceAssignment>
  </Project>
  <Project>
    <ObjectId>999</ObjectId>
    <Id>EMPTY-METADATA</Id>
  </Project>
</APIBusinessObjects>
"#;

#[test]
fn maps_projects_activities_and_links() {
    let doc = parse_p6xml(SAMPLE).unwrap();

    // The metadata-only project node is filtered out.
    let projects = doc.table("PROJECT").unwrap();
    assert_eq!(projects.rows.len(), 1);
    assert_eq!(projects.rows[0]["proj_id"], Scalar::Num(395.0));
    assert!(matches!(
        projects.rows[0]["last_recalc_date"],
        Scalar::Date(_)
    ));

    let tasks = doc.table("TASK").unwrap();
    assert_eq!(tasks.rows.len(), 2);
    let a1000 = tasks
        .rows
        .iter()
        .find(|r| r["task_code"] == Scalar::Str("A1000".into()))
        .unwrap();
    assert_eq!(a1000["task_id"], Scalar::Num(1001.0));
    assert_eq!(a1000["clndr_id"], Scalar::Num(7.0));
    assert_eq!(a1000["task_type"], Scalar::Str("Task Dependent".into()));
    assert_eq!(a1000["total_float_hr_cnt"], Scalar::Num(0.0));

    let links = doc.table("TASKPRED").unwrap();
    assert_eq!(links.rows.len(), 1);
    let link = &links.rows[0];
    assert_eq!(link["pred_task_id"], Scalar::Num(1001.0));
    // Successor inferred from the enclosing Activity.
    assert_eq!(link["task_id"], Scalar::Num(1002.0));
    assert_eq!(link["lag_hr_cnt"], Scalar::Num(16.0));

    let assignments = doc.table("TASKRSRC").unwrap();
    assert_eq!(assignments.rows.len(), 1);
    assert_eq!(assignments.rows[0]["task_id"], Scalar::Num(1001.0));
    assert_eq!(assignments.rows[0]["target_qty"], Scalar::Num(40.0));
}

#[test]
fn global_and_project_scope_merge_with_dedup() {
    let doc = parse_p6xml(SAMPLE).unwrap();

    // Calendar 7 appears both at document root and inside the project;
    // the key set folds it to one row.
    let calendars = doc.table("CALENDAR").unwrap();
    assert_eq!(calendars.rows.len(), 1);
    assert_eq!(calendars.rows[0]["day_hr_cnt"], Scalar::Num(8.0));

    let resources = doc.table("RSRC").unwrap();
    assert_eq!(resources.rows.len(), 1);
    assert_eq!(resources.rows[0]["rsrc_short_name"], Scalar::Str("ENG".into()));

    // Nested ResourceRole inherits the resource key.
    let roles = doc.table("RSRCROLE").unwrap();
    assert_eq!(roles.rows.len(), 1);
    assert_eq!(roles.rows[0]["rsrc_id"], Scalar::Num(21.0));
    assert_eq!(roles.rows[0]["role_id"], Scalar::Num(4.0));

    let currencies = doc.table("CURRTYPE").unwrap();
    assert_eq!(currencies.rows.len(), 1);
    assert_eq!(currencies.rows[0]["curr_symbol"], Scalar::Str("$".into()));
}

#[test]
fn malformed_xml_is_a_hard_error() {
    let err = parse_p6xml("<APIBusinessObjects><Project>").unwrap_err();
    assert!(matches!(err, Error::MalformedXml(_)));
}

#[test]
fn synthetic_keys_are_deterministic() {
    // No ObjectId anywhere: keys fall back to FNV-1a and must be stable
    // across runs, and the link's successor must match the activity's key.
    let xml = r#"<APIBusinessObjects>
      <Project>
        <Id>P1</Id>
        <Activity><Id>A</Id><Name>First</Name></Activity>
        <Activity>
          <Id>B</Id><Name>Second</Name>
          <PredecessorLink>
            <PredecessorActivityObjectId>12345</PredecessorActivityObjectId>
            <Type>Finish to Start</Type>
          </PredecessorLink>
        </Activity>
      </Project>
    </APIBusinessObjects>"#;
    let doc1 = parse_p6xml(xml).unwrap();
    let doc2 = parse_p6xml(xml).unwrap();

    let ids1: Vec<_> = doc1
        .table("TASK")
        .unwrap()
        .rows
        .iter()
        .map(|r| r["task_id"].clone())
        .collect();
    let ids2: Vec<_> = doc2
        .table("TASK")
        .unwrap()
        .rows
        .iter()
        .map(|r| r["task_id"].clone())
        .collect();
    assert_eq!(ids1, ids2);

    let b_key = doc1
        .table("TASK")
        .unwrap()
        .rows
        .iter()
        .find(|r| r["task_code"] == Scalar::Str("B".into()))
        .map(|r| r["task_id"].clone())
        .unwrap();
    assert_eq!(doc1.table("TASKPRED").unwrap().rows[0]["task_id"], b_key);
}

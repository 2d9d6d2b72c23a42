mod common;

use jobly::{Company, CompanyFilters, CompanyPatch, JoblyError, JoblyResult, NewCompany};

#[tokio::test]
async fn filter_by_min_employees() -> JoblyResult<()> {
    let Some(mut client) = common::connect("filter_by_min_employees").await? else {
        return Ok(());
    };
    let tx = common::fresh_schema(&mut client).await?;
    common::seed_companies(&tx).await?;

    let filters = CompanyFilters {
        min_employees: Some(30),
        ..Default::default()
    };
    let companies = Company::filter(&tx, &filters).await?;
    let handles: Vec<_> = companies.iter().map(|c| c.handle.as_str()).collect();
    assert_eq!(handles, ["c3"]);
    Ok(())
}

#[tokio::test]
async fn filter_combines_search_and_range() -> JoblyResult<()> {
    let Some(mut client) = common::connect("filter_combines_search_and_range").await? else {
        return Ok(());
    };
    let tx = common::fresh_schema(&mut client).await?;
    common::seed_companies(&tx).await?;

    let filters = CompanyFilters {
        search: Some("c".into()),
        min_employees: Some(1),
        max_employees: Some(60),
    };
    let companies = Company::filter(&tx, &filters).await?;
    assert_eq!(companies.len(), 1);
    assert_eq!(companies[0].handle, "c2");
    Ok(())
}

#[tokio::test]
async fn filter_without_keys_lists_everything() -> JoblyResult<()> {
    let Some(mut client) = common::connect("filter_without_keys_lists_everything").await? else {
        return Ok(());
    };
    let tx = common::fresh_schema(&mut client).await?;
    common::seed_companies(&tx).await?;

    let filtered = Company::filter(&tx, &CompanyFilters::default()).await?;
    assert_eq!(filtered, Company::all(&tx).await?);
    assert_eq!(filtered.len(), 3);
    Ok(())
}

#[tokio::test]
async fn filter_reports_no_match_and_bad_range() -> JoblyResult<()> {
    let Some(mut client) = common::connect("filter_reports_no_match_and_bad_range").await? else {
        return Ok(());
    };
    let tx = common::fresh_schema(&mut client).await?;
    common::seed_companies(&tx).await?;

    let nothing = CompanyFilters {
        search: Some("nope".into()),
        ..Default::default()
    };
    let err = Company::filter(&tx, &nothing).await.unwrap_err();
    assert!(matches!(err, JoblyError::UnmatchedFilter(_)));
    assert!(err.is_client_error());
    assert_eq!(err.to_string(), "No companies exist with those parameters");

    let inverted = CompanyFilters {
        min_employees: Some(100),
        max_employees: Some(10),
        ..Default::default()
    };
    let err = Company::filter(&tx, &inverted).await.unwrap_err();
    assert!(matches!(err, JoblyError::InvalidRange { .. }));
    assert_eq!(err.to_string(), "Max value cannot be lower than min value");
    Ok(())
}

#[tokio::test]
async fn create_get_update_delete() -> JoblyResult<()> {
    let Some(mut client) = common::connect("create_get_update_delete").await? else {
        return Ok(());
    };
    let tx = common::fresh_schema(&mut client).await?;

    let new = NewCompany {
        handle: "test1".into(),
        name: "Test One".into(),
        description: Some("original".into()),
        num_employees: Some(10),
        logo_url: None,
    };
    let created = Company::create(&tx, &new).await?;
    assert_eq!(created.handle, "test1");
    assert_eq!(Company::get(&tx, "test1").await?, created);

    let patch = CompanyPatch {
        description: Some(Some("updated".into())),
        num_employees: Some(None),
        ..Default::default()
    };
    let updated = Company::update(&tx, "test1", &patch).await?;
    assert_eq!(updated.description.as_deref(), Some("updated"));
    assert_eq!(updated.num_employees, None);
    assert_eq!(updated.name, "Test One");

    Company::delete(&tx, "test1").await?;
    let err = Company::get(&tx, "test1").await.unwrap_err();
    assert_eq!(err.to_string(), "Company not found");

    // A failed statement aborts the transaction, so this goes last.
    Company::create(&tx, &new).await?;
    let err = Company::create(&tx, &new).await.unwrap_err();
    assert!(err.is_unique_violation());
    Ok(())
}

#[tokio::test]
async fn missing_company_errors() -> JoblyResult<()> {
    let Some(mut client) = common::connect("missing_company_errors").await? else {
        return Ok(());
    };
    let tx = common::fresh_schema(&mut client).await?;

    let patch = CompanyPatch {
        name: Some("Ghost".into()),
        ..Default::default()
    };
    let err = Company::update(&tx, "ghost", &patch).await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "Company does not exist");

    let err = Company::delete(&tx, "ghost").await.unwrap_err();
    assert!(err.is_not_found());

    let err = Company::update(&tx, "ghost", &CompanyPatch::default())
        .await
        .unwrap_err();
    assert!(matches!(err, JoblyError::EmptyUpdate));
    Ok(())
}

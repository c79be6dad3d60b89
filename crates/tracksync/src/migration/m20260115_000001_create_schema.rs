//! Initial migration to create the tracksync database schema.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        self.create_visits(manager).await?;
        self.create_clicks(manager).await?;
        self.create_conversions(manager).await?;
        self.create_sync_cursors(manager).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SyncCursors::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Conversions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Clicks::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Visits::Table).to_owned())
            .await?;
        Ok(())
    }
}

impl Migration {
    async fn create_visits(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Visits::Table)
                    .if_not_exists()
                    // Internal
                    .col(ColumnDef::new(Visits::Id).uuid().not_null().primary_key())
                    // Identity
                    .col(ColumnDef::new(Visits::ClickId).string().not_null())
                    .col(ColumnDef::new(Visits::ExternalId).string().null())
                    // Campaign / funnel
                    .col(ColumnDef::new(Visits::CampaignId).string().null())
                    .col(ColumnDef::new(Visits::CampaignName).string().null())
                    .col(ColumnDef::new(Visits::TrafficSourceId).string().null())
                    .col(ColumnDef::new(Visits::TrafficSourceName).string().null())
                    .col(ColumnDef::new(Visits::OfferId).string().null())
                    .col(ColumnDef::new(Visits::OfferName).string().null())
                    .col(ColumnDef::new(Visits::AffiliateNetworkId).string().null())
                    .col(ColumnDef::new(Visits::AffiliateNetworkName).string().null())
                    .col(ColumnDef::new(Visits::LanderId).string().null())
                    .col(ColumnDef::new(Visits::LanderName).string().null())
                    // Timing
                    .col(ColumnDef::new(Visits::VisitTimestamp).string().null())
                    // Geo
                    .col(ColumnDef::new(Visits::CountryCode).string().null())
                    .col(ColumnDef::new(Visits::CountryName).string().null())
                    .col(ColumnDef::new(Visits::Region).string().null())
                    .col(ColumnDef::new(Visits::City).string().null())
                    // Device
                    .col(ColumnDef::new(Visits::Device).string().null())
                    .col(ColumnDef::new(Visits::DeviceName).string().null())
                    .col(ColumnDef::new(Visits::Brand).string().null())
                    .col(ColumnDef::new(Visits::Model).string().null())
                    .col(ColumnDef::new(Visits::Os).string().null())
                    .col(ColumnDef::new(Visits::OsVersion).string().null())
                    .col(ColumnDef::new(Visits::Browser).string().null())
                    .col(ColumnDef::new(Visits::BrowserVersion).string().null())
                    // Connection
                    .col(ColumnDef::new(Visits::ConnectionType).string().null())
                    .col(ColumnDef::new(Visits::Isp).string().null())
                    .col(ColumnDef::new(Visits::MobileCarrier).string().null())
                    .col(ColumnDef::new(Visits::Ip).string().null())
                    // Request context
                    .col(ColumnDef::new(Visits::Referrer).text().null())
                    .col(ColumnDef::new(Visits::UserAgent).text().null())
                    // Custom variables
                    .col(ColumnDef::new(Visits::CustomVar1).string().null())
                    .col(ColumnDef::new(Visits::CustomVar2).string().null())
                    .col(ColumnDef::new(Visits::CustomVar3).string().null())
                    .col(ColumnDef::new(Visits::CustomVar4).string().null())
                    .col(ColumnDef::new(Visits::CustomVar5).string().null())
                    .col(ColumnDef::new(Visits::CustomVar6).string().null())
                    .col(ColumnDef::new(Visits::CustomVar7).string().null())
                    .col(ColumnDef::new(Visits::CustomVar8).string().null())
                    .col(ColumnDef::new(Visits::CustomVar9).string().null())
                    .col(ColumnDef::new(Visits::CustomVar10).string().null())
                    // Forward compatibility
                    .col(
                        ColumnDef::new(Visits::RawData)
                            .json()
                            .not_null()
                            .default(Expr::cust("'{}'")),
                    )
                    // Tracking
                    .col(
                        ColumnDef::new(Visits::SyncedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Natural key: one row per click id.
        manager
            .create_index(
                Index::create()
                    .name("idx_visits_click_id")
                    .table(Visits::Table)
                    .col(Visits::ClickId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Retention sweeps and reporting scans filter on sync time.
        manager
            .create_index(
                Index::create()
                    .name("idx_visits_synced_at")
                    .table(Visits::Table)
                    .col(Visits::SyncedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_visits_campaign_id")
                    .table(Visits::Table)
                    .col(Visits::CampaignId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn create_clicks(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Clicks::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Clicks::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Clicks::ClickId).string().not_null())
                    .col(ColumnDef::new(Clicks::ExternalId).string().null())
                    .col(ColumnDef::new(Clicks::CampaignId).string().null())
                    .col(ColumnDef::new(Clicks::CampaignName).string().null())
                    .col(ColumnDef::new(Clicks::OfferId).string().null())
                    .col(ColumnDef::new(Clicks::OfferName).string().null())
                    .col(ColumnDef::new(Clicks::LanderId).string().null())
                    .col(ColumnDef::new(Clicks::LanderName).string().null())
                    .col(ColumnDef::new(Clicks::ClickTimestamp).string().null())
                    .col(ColumnDef::new(Clicks::CountryCode).string().null())
                    .col(ColumnDef::new(Clicks::CountryName).string().null())
                    .col(ColumnDef::new(Clicks::Device).string().null())
                    .col(ColumnDef::new(Clicks::Os).string().null())
                    .col(ColumnDef::new(Clicks::Browser).string().null())
                    .col(ColumnDef::new(Clicks::Ip).string().null())
                    .col(
                        ColumnDef::new(Clicks::RawData)
                            .json()
                            .not_null()
                            .default(Expr::cust("'{}'")),
                    )
                    .col(
                        ColumnDef::new(Clicks::SyncedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_clicks_click_id")
                    .table(Clicks::Table)
                    .col(Clicks::ClickId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_clicks_synced_at")
                    .table(Clicks::Table)
                    .col(Clicks::SyncedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn create_conversions(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Conversions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Conversions::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    // Identity
                    .col(ColumnDef::new(Conversions::ClickId).string().not_null())
                    .col(
                        ColumnDef::new(Conversions::PostbackTimestamp)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Conversions::ExternalId).string().null())
                    .col(ColumnDef::new(Conversions::TransactionId).string().null())
                    // Campaign / funnel
                    .col(ColumnDef::new(Conversions::CampaignId).string().null())
                    .col(ColumnDef::new(Conversions::CampaignName).string().null())
                    .col(ColumnDef::new(Conversions::OfferId).string().null())
                    .col(ColumnDef::new(Conversions::OfferName).string().null())
                    .col(
                        ColumnDef::new(Conversions::AffiliateNetworkId)
                            .string()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Conversions::AffiliateNetworkName)
                            .string()
                            .null(),
                    )
                    // Timing
                    .col(ColumnDef::new(Conversions::VisitTimestamp).string().null())
                    // Geo
                    .col(ColumnDef::new(Conversions::CountryCode).string().null())
                    .col(ColumnDef::new(Conversions::CountryName).string().null())
                    // Money
                    .col(
                        ColumnDef::new(Conversions::Revenue)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(Conversions::Payout)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(Conversions::Cost)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(Conversions::Profit)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    // Device / connection
                    .col(ColumnDef::new(Conversions::Device).string().null())
                    .col(ColumnDef::new(Conversions::Os).string().null())
                    .col(ColumnDef::new(Conversions::Browser).string().null())
                    .col(ColumnDef::new(Conversions::ConnectionType).string().null())
                    .col(ColumnDef::new(Conversions::Isp).string().null())
                    .col(ColumnDef::new(Conversions::Ip).string().null())
                    // Custom variables
                    .col(ColumnDef::new(Conversions::CustomVar1).string().null())
                    .col(ColumnDef::new(Conversions::CustomVar2).string().null())
                    .col(ColumnDef::new(Conversions::CustomVar3).string().null())
                    .col(ColumnDef::new(Conversions::CustomVar4).string().null())
                    .col(ColumnDef::new(Conversions::CustomVar5).string().null())
                    // Forward compatibility
                    .col(
                        ColumnDef::new(Conversions::RawData)
                            .json()
                            .not_null()
                            .default(Expr::cust("'{}'")),
                    )
                    // Tracking
                    .col(
                        ColumnDef::new(Conversions::SyncedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Natural key: one row per (click, postback time).
        manager
            .create_index(
                Index::create()
                    .name("idx_conversions_click_postback")
                    .table(Conversions::Table)
                    .col(Conversions::ClickId)
                    .col(Conversions::PostbackTimestamp)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_conversions_synced_at")
                    .table(Conversions::Table)
                    .col(Conversions::SyncedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_conversions_campaign_id")
                    .table(Conversions::Table)
                    .col(Conversions::CampaignId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn create_sync_cursors(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SyncCursors::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SyncCursors::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SyncCursors::EntityType).string().not_null())
                    .col(
                        ColumnDef::new(SyncCursors::LastSyncTimestamp)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SyncCursors::RecordsSynced)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(SyncCursors::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_sync_cursors_entity_type")
                    .table(SyncCursors::Table)
                    .col(SyncCursors::EntityType)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Visits {
    Table,
    Id,
    ClickId,
    ExternalId,
    CampaignId,
    CampaignName,
    TrafficSourceId,
    TrafficSourceName,
    OfferId,
    OfferName,
    AffiliateNetworkId,
    AffiliateNetworkName,
    LanderId,
    LanderName,
    VisitTimestamp,
    CountryCode,
    CountryName,
    Region,
    City,
    Device,
    DeviceName,
    Brand,
    Model,
    Os,
    OsVersion,
    Browser,
    BrowserVersion,
    ConnectionType,
    Isp,
    MobileCarrier,
    Ip,
    Referrer,
    UserAgent,
    #[sea_orm(iden = "custom_var_1")]
    CustomVar1,
    #[sea_orm(iden = "custom_var_2")]
    CustomVar2,
    #[sea_orm(iden = "custom_var_3")]
    CustomVar3,
    #[sea_orm(iden = "custom_var_4")]
    CustomVar4,
    #[sea_orm(iden = "custom_var_5")]
    CustomVar5,
    #[sea_orm(iden = "custom_var_6")]
    CustomVar6,
    #[sea_orm(iden = "custom_var_7")]
    CustomVar7,
    #[sea_orm(iden = "custom_var_8")]
    CustomVar8,
    #[sea_orm(iden = "custom_var_9")]
    CustomVar9,
    #[sea_orm(iden = "custom_var_10")]
    CustomVar10,
    RawData,
    SyncedAt,
}

#[derive(DeriveIden)]
enum Clicks {
    Table,
    Id,
    ClickId,
    ExternalId,
    CampaignId,
    CampaignName,
    OfferId,
    OfferName,
    LanderId,
    LanderName,
    ClickTimestamp,
    CountryCode,
    CountryName,
    Device,
    Os,
    Browser,
    Ip,
    RawData,
    SyncedAt,
}

#[derive(DeriveIden)]
enum Conversions {
    Table,
    Id,
    ClickId,
    PostbackTimestamp,
    ExternalId,
    TransactionId,
    CampaignId,
    CampaignName,
    OfferId,
    OfferName,
    AffiliateNetworkId,
    AffiliateNetworkName,
    VisitTimestamp,
    CountryCode,
    CountryName,
    Revenue,
    Payout,
    Cost,
    Profit,
    Device,
    Os,
    Browser,
    ConnectionType,
    Isp,
    Ip,
    #[sea_orm(iden = "custom_var_1")]
    CustomVar1,
    #[sea_orm(iden = "custom_var_2")]
    CustomVar2,
    #[sea_orm(iden = "custom_var_3")]
    CustomVar3,
    #[sea_orm(iden = "custom_var_4")]
    CustomVar4,
    #[sea_orm(iden = "custom_var_5")]
    CustomVar5,
    RawData,
    SyncedAt,
}

#[derive(DeriveIden)]
enum SyncCursors {
    Table,
    Id,
    EntityType,
    LastSyncTimestamp,
    RecordsSynced,
    UpdatedAt,
}

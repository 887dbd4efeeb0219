//! GraphQL mutation documents

use super::queries::build_fragment;

// ============================================================================
// Builds
// ============================================================================

pub const CREATE_BUILD: &str = concat!(
    build_fragment!(),
    r"
mutation CreateBuild($appId: ID!, $platform: AppPlatform!, $buildProfile: String, $channel: String, $gitCommitHash: String) {
  build {
    createBuildForApp(
      appId: $appId
      buildParams: {
        platform: $platform
        buildProfile: $buildProfile
        channel: $channel
        gitCommitHash: $gitCommitHash
      }
    ) {
      ...BuildFragment
    }
  }
}
"
);

pub const CANCEL_BUILD: &str = r"
mutation CancelBuild($buildId: ID!) {
  build {
    cancel(buildId: $buildId) {
      id
      status
    }
  }
}
";

pub const RETRY_BUILD: &str = concat!(
    build_fragment!(),
    r"
mutation RetryBuild($buildId: ID!) {
  build {
    retry(buildId: $buildId) {
      ...BuildFragment
    }
  }
}
"
);

pub const DELETE_BUILD: &str = r"
mutation DeleteBuild($buildId: ID!) {
  build {
    deleteBuild(buildId: $buildId) {
      id
    }
  }
}
";

// ============================================================================
// Submissions
// ============================================================================

pub const CREATE_SUBMISSION: &str = r"
mutation CreateSubmission($appId: ID!, $platform: AppPlatform!, $buildId: ID, $config: SubmissionConfigInput) {
  submission {
    createSubmission(
      appId: $appId
      platform: $platform
      buildId: $buildId
      config: $config
    ) {
      id
      status
      platform
      createdAt
    }
  }
}
";

pub const CANCEL_SUBMISSION: &str = r"
mutation CancelSubmission($submissionId: ID!) {
  submission {
    cancelSubmission(submissionId: $submissionId) {
      id
      status
    }
  }
}
";

pub const RETRY_SUBMISSION: &str = r"
mutation RetrySubmission($submissionId: ID!) {
  submission {
    retrySubmission(submissionId: $submissionId) {
      id
      status
      platform
      createdAt
    }
  }
}
";

// ============================================================================
// Branches
// ============================================================================

pub const CREATE_BRANCH: &str = r"
mutation CreateBranch($appId: ID!, $name: String!) {
  updateBranch {
    createUpdateBranchForApp(appId: $appId, name: $name) {
      id
      name
      createdAt
      updatedAt
    }
  }
}
";

pub const DELETE_BRANCH: &str = r"
mutation DeleteBranch($branchId: ID!) {
  updateBranch {
    deleteUpdateBranch(branchId: $branchId) {
      id
    }
  }
}
";

pub const UPDATE_BRANCH: &str = r"
mutation UpdateBranch($branchId: ID!, $name: String!) {
  updateBranch {
    editUpdateBranch(branchId: $branchId, newName: $name) {
      id
      name
      updatedAt
    }
  }
}
";

// ============================================================================
// Channels
// ============================================================================

pub const CREATE_CHANNEL: &str = r"
mutation CreateChannel($appId: ID!, $name: String!, $branchMapping: String) {
  updateChannel {
    createUpdateChannelForApp(appId: $appId, name: $name, branchMapping: $branchMapping) {
      id
      name
      createdAt
      branchMapping
    }
  }
}
";

pub const DELETE_CHANNEL: &str = r"
mutation DeleteChannel($channelId: ID!) {
  updateChannel {
    deleteUpdateChannel(channelId: $channelId) {
      id
    }
  }
}
";

pub const UPDATE_CHANNEL: &str = r"
mutation UpdateChannel($channelId: ID!, $branchMapping: String!) {
  updateChannel {
    editUpdateChannel(channelId: $channelId, branchMapping: $branchMapping) {
      id
      name
      branchMapping
      updatedAt
    }
  }
}
";

// ============================================================================
// Secrets
// ============================================================================

pub const CREATE_SECRET: &str = r"
mutation CreateSecret($appId: ID!, $name: String!, $value: String!, $type: EnvironmentSecretType) {
  environmentSecret {
    createEnvironmentSecretForApp(appId: $appId, environmentSecretData: { name: $name, value: $value, type: $type }) {
      id
      name
      type
      createdAt
    }
  }
}
";

pub const UPDATE_SECRET: &str = r"
mutation UpdateSecret($secretId: ID!, $value: String!) {
  environmentSecret {
    updateEnvironmentSecret(environmentSecretId: $secretId, environmentSecretData: { value: $value }) {
      id
      name
      updatedAt
    }
  }
}
";

pub const DELETE_SECRET: &str = r"
mutation DeleteSecret($secretId: ID!) {
  environmentSecret {
    deleteEnvironmentSecret(environmentSecretId: $secretId) {
      id
    }
  }
}
";

// ============================================================================
// Webhooks
// ============================================================================

pub const CREATE_WEBHOOK: &str = r"
mutation CreateWebhook($appId: ID!, $url: String!, $secret: String!, $event: WebhookType!) {
  webhook {
    createWebhook(appId: $appId, webhookInput: { url: $url, secret: $secret, event: $event }) {
      id
      url
      event
      createdAt
    }
  }
}
";

pub const UPDATE_WEBHOOK: &str = r"
mutation UpdateWebhook($webhookId: ID!, $url: String, $secret: String, $event: WebhookType) {
  webhook {
    updateWebhook(webhookId: $webhookId, webhookInput: { url: $url, secret: $secret, event: $event }) {
      id
      url
      event
      updatedAt
    }
  }
}
";

pub const DELETE_WEBHOOK: &str = r"
mutation DeleteWebhook($webhookId: ID!) {
  webhook {
    deleteWebhook(webhookId: $webhookId) {
      id
    }
  }
}
";

// ============================================================================
// Devices
// ============================================================================

pub const REGISTER_DEVICE: &str = r"
mutation RegisterDevice($appId: ID!, $deviceData: AppleDeviceInput!) {
  appleDevice {
    createAppleDevice(appId: $appId, appleDeviceInput: $deviceData) {
      id
      identifier
      name
      deviceClass
      createdAt
      enabled
    }
  }
}
";

pub const DELETE_DEVICE: &str = r"
mutation DeleteDevice($deviceId: ID!) {
  appleDevice {
    deleteAppleDevice(appleDeviceId: $deviceId) {
      id
    }
  }
}
";

pub const CREATE_PROVISIONING_PROFILE: &str = r"
mutation CreateProvisioningProfile($appId: ID!, $appleTeamId: String!, $deviceIds: [ID!]!) {
  iosAppCredentials {
    createProvisioningProfile(
      appId: $appId
      appleTeamId: $appleTeamId
      deviceIds: $deviceIds
    ) {
      id
      expiration
      appleDevices {
        id
        identifier
        name
      }
    }
  }
}
";

// ============================================================================
// Updates
// ============================================================================

pub const DELETE_UPDATE: &str = r"
mutation DeleteUpdate($updateId: ID!) {
  update {
    deleteUpdate(updateId: $updateId) {
      id
    }
  }
}
";

// ============================================================================
// Projects
// ============================================================================

pub const CREATE_PROJECT: &str = r"
mutation CreateProject($accountId: ID!, $projectName: String!, $privacy: AppPrivacy) {
  app {
    createApp(appInput: { accountId: $accountId, projectName: $projectName, privacy: $privacy }) {
      id
      name
      slug
      fullName
      privacy
      createdAt
    }
  }
}
";

pub const UPDATE_PROJECT: &str = r"
mutation UpdateProject($appId: ID!, $privacy: AppPrivacy, $description: String) {
  app {
    editApp(appId: $appId, appInput: { privacy: $privacy, description: $description }) {
      id
      name
      description
      privacy
      updatedAt
    }
  }
}
";

pub const DELETE_PROJECT: &str = r"
mutation DeleteProject($appId: ID!) {
  app {
    deleteApp(appId: $appId) {
      id
    }
  }
}
";

pub const TRANSFER_PROJECT: &str = r"
mutation TransferProject($appId: ID!, $toAccountId: ID!) {
  app {
    transferApp(appId: $appId, destinationAccountId: $toAccountId) {
      id
      fullName
      ownerAccount {
        id
        name
      }
    }
  }
}
";

// ============================================================================
// Credentials
// ============================================================================

pub const CREATE_IOS_APP_CREDENTIALS: &str = r"
mutation CreateIosAppCredentials($appId: ID!, $bundleIdentifier: String!, $appleTeamId: String!) {
  iosAppCredentials {
    createIosAppCredentials(
      appId: $appId
      appleAppIdentifierInput: { bundleIdentifier: $bundleIdentifier }
      appleTeam: { id: $appleTeamId }
    ) {
      id
      appleTeam {
        id
        appleTeamIdentifier
        appleTeamName
      }
    }
  }
}
";

pub const CREATE_ANDROID_KEYSTORE: &str = r"
mutation CreateAndroidKeystore($appId: ID!, $keystore: AndroidKeystoreInput!) {
  androidAppCredentials {
    createAndroidAppCredentials(
      appId: $appId
      androidAppCredentialsInput: {
        androidKeystore: $keystore
      }
    ) {
      id
      androidKeystore {
        id
        keyAlias
        type
        createdAt
      }
    }
  }
}
";

pub const DELETE_IOS_APP_CREDENTIALS: &str = r"
mutation DeleteIosAppCredentials($credentialId: ID!) {
  iosAppCredentials {
    deleteIosAppCredentials(iosAppCredentialsId: $credentialId) {
      id
    }
  }
}
";

pub const DELETE_ANDROID_APP_CREDENTIALS: &str = r"
mutation DeleteAndroidKeystore($credentialId: ID!) {
  androidAppCredentials {
    deleteAndroidAppCredentials(androidAppCredentialsId: $credentialId) {
      id
    }
  }
}
";

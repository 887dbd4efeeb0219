//! GraphQL query documents

/// Fields selected for every build
macro_rules! build_fragment {
    () => {
        r"
fragment BuildFragment on Build {
  id
  status
  platform
  distribution
  buildProfile
  channel
  gitCommitHash
  createdAt
  updatedAt
  completedAt
  expirationDate
  artifacts {
    buildUrl
    applicationArchiveUrl
    logsS3KeyPrefix
  }
  error {
    message
    errorCode
  }
  metrics {
    buildDuration
    buildQueueTime
  }
  project {
    id
    name
    slug
    fullName
  }
}
"
    };
}

pub(crate) use build_fragment;

// ============================================================================
// Viewer / Account / Project lookup
// ============================================================================

pub const VIEWER: &str = r"
query Viewer {
  viewer {
    id
    username
    email
    accounts {
      id
      name
    }
  }
}
";

pub const GET_ACCOUNT_ID: &str = r"
query GetAccountId($accountName: String!) {
  account {
    byName(accountName: $accountName) {
      id
    }
  }
}
";

pub const GET_PROJECT_ID: &str = r"
query GetProjectId($fullName: String!) {
  app {
    byFullName(fullName: $fullName) {
      id
    }
  }
}
";

// ============================================================================
// Builds
// ============================================================================

pub const GET_BUILD: &str = concat!(
    build_fragment!(),
    r"
query GetBuild($buildId: ID!) {
  builds {
    byId(buildId: $buildId) {
      ...BuildFragment
    }
  }
}
"
);

pub const GET_BUILDS: &str = concat!(
    build_fragment!(),
    r"
query GetBuilds($appId: String!, $platform: AppPlatform, $status: BuildStatus, $first: Int, $after: String) {
  app {
    byFullName(fullName: $appId) {
      builds(platform: $platform, status: $status, first: $first, after: $after) {
        edges {
          node {
            ...BuildFragment
          }
          cursor
        }
        pageInfo {
          hasNextPage
          endCursor
        }
      }
    }
  }
}
"
);

pub const GET_BUILD_LOGS: &str = r"
query GetBuildLogs($buildId: ID!) {
  builds {
    byId(buildId: $buildId) {
      id
      artifacts {
        logsS3KeyPrefix
      }
    }
  }
}
";

// ============================================================================
// Submissions
// ============================================================================

pub const GET_SUBMISSION: &str = r"
query GetSubmission($submissionId: ID!) {
  submission {
    byId(submissionId: $submissionId) {
      id
      status
      platform
      createdAt
      updatedAt
      completedAt
      error {
        message
        errorCode
      }
    }
  }
}
";

pub const GET_SUBMISSIONS: &str = r"
query GetSubmissions($appId: String!, $platform: AppPlatform, $status: SubmissionStatus, $first: Int, $after: String) {
  app {
    byFullName(fullName: $appId) {
      submissions(platform: $platform, status: $status, first: $first, after: $after) {
        edges {
          node {
            id
            status
            platform
            createdAt
            updatedAt
            completedAt
            error {
              message
              errorCode
            }
          }
          cursor
        }
        pageInfo {
          hasNextPage
          endCursor
        }
      }
    }
  }
}
";

// ============================================================================
// Updates
// ============================================================================

pub const GET_UPDATE: &str = r"
query GetUpdate($updateId: ID!) {
  update {
    byId(updateId: $updateId) {
      id
      group
      message
      runtimeVersion
      platform
      gitCommitHash
      createdAt
      isRollBackToEmbedded
      manifestPermalink
    }
  }
}
";

pub const GET_UPDATES_BY_BRANCH: &str = r"
query GetUpdatesByBranch($appId: String!, $branchName: String!, $first: Int, $after: String) {
  app {
    byFullName(fullName: $appId) {
      updateBranchByName(name: $branchName) {
        id
        name
        updates(first: $first, after: $after) {
          edges {
            node {
              id
              group
              message
              runtimeVersion
              platform
              gitCommitHash
              createdAt
              isRollBackToEmbedded
              manifestPermalink
            }
            cursor
          }
          pageInfo {
            hasNextPage
            endCursor
          }
        }
      }
    }
  }
}
";

// ============================================================================
// Branches
// ============================================================================

pub const GET_BRANCH: &str = r"
query GetBranch($appId: String!, $branchName: String!) {
  app {
    byFullName(fullName: $appId) {
      updateBranchByName(name: $branchName) {
        id
        name
        createdAt
        updatedAt
      }
    }
  }
}
";

pub const GET_BRANCHES: &str = r"
query GetBranches($appId: String!, $first: Int, $after: String) {
  app {
    byFullName(fullName: $appId) {
      updateBranches(first: $first, after: $after) {
        edges {
          node {
            id
            name
            createdAt
            updatedAt
          }
          cursor
        }
        pageInfo {
          hasNextPage
          endCursor
        }
      }
    }
  }
}
";

// ============================================================================
// Channels
// ============================================================================

pub const GET_CHANNEL: &str = r"
query GetChannel($appId: String!, $channelName: String!) {
  app {
    byFullName(fullName: $appId) {
      updateChannelByName(name: $channelName) {
        id
        name
        createdAt
        updatedAt
        branchMapping
        updateBranch {
          id
          name
        }
      }
    }
  }
}
";

pub const GET_CHANNELS: &str = r"
query GetChannels($appId: String!, $first: Int, $after: String) {
  app {
    byFullName(fullName: $appId) {
      updateChannels(first: $first, after: $after) {
        edges {
          node {
            id
            name
            createdAt
            updatedAt
            branchMapping
            updateBranch {
              id
              name
            }
          }
          cursor
        }
        pageInfo {
          hasNextPage
          endCursor
        }
      }
    }
  }
}
";

// ============================================================================
// Projects
// ============================================================================

pub const GET_PROJECT: &str = r"
query GetProject($appId: String!) {
  app {
    byFullName(fullName: $appId) {
      id
      name
      slug
      fullName
      description
      privacy
      createdAt
      updatedAt
      ownerAccount {
        id
        name
      }
      githubRepository {
        githubRepoOwnerName
        githubRepoName
      }
    }
  }
}
";

pub const GET_PROJECTS: &str = r"
query GetProjects($accountName: String!, $first: Int, $after: String) {
  account {
    byName(accountName: $accountName) {
      apps(first: $first, after: $after) {
        edges {
          node {
            id
            name
            slug
            fullName
            description
            privacy
            createdAt
            updatedAt
            ownerAccount {
              id
              name
            }
          }
          cursor
        }
        pageInfo {
          hasNextPage
          endCursor
        }
      }
    }
  }
}
";

// ============================================================================
// Secrets
// ============================================================================

pub const GET_SECRETS: &str = r"
query GetSecrets($appId: String!) {
  app {
    byFullName(fullName: $appId) {
      environmentSecrets {
        id
        name
        type
        createdAt
        updatedAt
      }
    }
  }
}
";

// ============================================================================
// Webhooks
// ============================================================================

pub const GET_WEBHOOKS: &str = r"
query GetWebhooks($appId: String!) {
  app {
    byFullName(fullName: $appId) {
      webhooks {
        id
        url
        event
        createdAt
        updatedAt
      }
    }
  }
}
";

pub const GET_WEBHOOK_DELIVERIES: &str = r"
query GetWebhookDeliveries($appId: String!, $webhookId: ID!) {
  app {
    byFullName(fullName: $appId) {
      webhooks(filter: { id: $webhookId }) {
        id
        deliveries(first: 50) {
          edges {
            node {
              id
              event
              successful
              responseCode
              createdAt
            }
          }
        }
      }
    }
  }
}
";

// ============================================================================
// Devices
// ============================================================================

pub const GET_DEVICES: &str = r"
query GetDevices($appId: String!, $first: Int, $after: String) {
  app {
    byFullName(fullName: $appId) {
      appleDevices(first: $first, after: $after) {
        edges {
          node {
            id
            identifier
            name
            deviceClass
            createdAt
            enabled
          }
          cursor
        }
        pageInfo {
          hasNextPage
          endCursor
        }
      }
    }
  }
}
";

// ============================================================================
// Credentials
// ============================================================================

pub const GET_IOS_DISTRIBUTION_CREDENTIALS: &str = r"
query GetIosDistributionCredentials($appId: String!, $appleTeamIdentifier: String) {
  app {
    byFullName(fullName: $appId) {
      iosAppCredentials(filter: { appleTeamIdentifier: $appleTeamIdentifier }) {
        id
        appleTeam {
          id
          appleTeamIdentifier
          appleTeamName
        }
        iosAppBuildCredentialsList {
          id
          distributionCertificate {
            id
            serialNumber
            validityNotBefore
            validityNotAfter
            appleTeam {
              appleTeamIdentifier
              appleTeamName
            }
          }
        }
      }
    }
  }
}
";

pub const GET_IOS_PUSH_CREDENTIALS: &str = r"
query GetIosPushCredentials($appId: String!) {
  app {
    byFullName(fullName: $appId) {
      iosAppCredentials {
        id
        pushKey {
          id
          keyIdentifier
          apnsEnvironment
          createdAt
          updatedAt
        }
      }
    }
  }
}
";

pub const GET_ANDROID_KEYSTORE: &str = r"
query GetAndroidKeystore($appId: String!) {
  app {
    byFullName(fullName: $appId) {
      androidAppCredentials {
        id
        androidKeystore {
          id
          keyAlias
          type
          createdAt
          updatedAt
        }
      }
    }
  }
}
";

pub const GET_ANDROID_FCM_CREDENTIALS: &str = r"
query GetAndroidFcmCredentials($appId: String!) {
  app {
    byFullName(fullName: $appId) {
      androidAppCredentials {
        id
        fcmV1Credential {
          id
          snippet
          createdAt
          updatedAt
        }
      }
    }
  }
}
";
